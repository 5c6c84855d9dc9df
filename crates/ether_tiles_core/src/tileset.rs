//! Tileset configuration with a sparse per-tile property index

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{CollisionData, PropertyValue, TileBehavior, TilesetError};

/// Per-tile properties, keyed by property name
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct TileProperties {
    properties: BTreeMap<String, PropertyValue>,
}

/// Returned for in-range tiles that declare nothing
static PLAIN_TILE: TileProperties = TileProperties::new();

impl TileProperties {
    pub const fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    /// Set a property, replacing any previous value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Boolean flag; absent or non-boolean reads as `false`
    pub fn flag(&self, name: &str) -> bool {
        self.flag_or(name, false)
    }

    /// Boolean flag with an explicit default for absence
    pub fn flag_or(&self, name: &str, default: bool) -> bool {
        self.properties
            .get(name)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(default)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.properties.get(name).and_then(PropertyValue::as_int)
    }

    /// Float value, widening integers
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.properties.get(name).and_then(PropertyValue::as_float)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(PropertyValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PropertyValue)> {
        self.properties.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for TileProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            properties: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The source image the tiles are sliced from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TilesetImage {
    /// Path to the image file (relative to the tileset document)
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl TilesetImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// Pixel rectangle of one tile inside the source image
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A tileset: a grid of equally sized tiles sliced from one image, plus a
/// sparse table of per-tile properties.
///
/// Immutable once loaded; share it behind `Arc` or `&` freely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_count: u32,
    pub columns: u32,
    #[serde(default)]
    pub spacing: u32,
    #[serde(default)]
    pub margin: u32,
    pub image: TilesetImage,
    /// Tiled format version of the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Version of the Tiled editor that saved the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tiled_version: Option<String>,
    /// Tileset-level properties
    #[serde(default, skip_serializing_if = "TileProperties::is_empty")]
    pub properties: TileProperties,
    /// Declared tiles only; every other id in range is a plain tile
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tiles: BTreeMap<u32, TileProperties>,
}

impl Tileset {
    /// Create a tileset with no declared tiles; `tile_count` is derived
    /// from the image and grid.
    pub fn new(
        name: impl Into<String>,
        tile_width: u32,
        tile_height: u32,
        columns: u32,
        image: TilesetImage,
    ) -> Self {
        let mut tileset = Self {
            name: name.into(),
            tile_width,
            tile_height,
            tile_count: 0,
            columns,
            spacing: 0,
            margin: 0,
            image,
            version: None,
            tiled_version: None,
            properties: TileProperties::new(),
            tiles: BTreeMap::new(),
        };
        tileset.tile_count = tileset.rows().checked_mul(columns).unwrap_or(0);
        tileset
    }

    /// Rows of tiles that fit in the image, 0 if the geometry overflows
    pub fn rows(&self) -> u32 {
        rows_for(self.image.height, self.tile_height, self.margin, self.spacing).unwrap_or(0)
    }

    /// Declare properties for a tile. Empty sets remove the declaration.
    pub fn set_tile_properties(
        &mut self,
        id: u32,
        properties: TileProperties,
    ) -> Result<(), TilesetError> {
        self.check_range(id)?;
        if properties.is_empty() {
            self.tiles.remove(&id);
        } else {
            self.tiles.insert(id, properties);
        }
        Ok(())
    }

    /// Properties declared for `id`, or an empty set for a plain tile
    pub fn properties_of(&self, id: u32) -> Result<&TileProperties, TilesetError> {
        self.check_range(id)?;
        Ok(self.tiles.get(&id).unwrap_or(&PLAIN_TILE))
    }

    /// Ids with at least one declared property, ascending
    pub fn declared_tiles(&self) -> impl Iterator<Item = (u32, &TileProperties)> {
        self.tiles.iter().map(|(id, props)| (*id, props))
    }

    pub fn is_collidable(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "collidable")
    }

    pub fn is_ground(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "ground")
    }

    pub fn is_collectable(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "collectable")
    }

    pub fn is_healing(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "healing")
    }

    pub fn is_fall(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "fall")
    }

    pub fn is_fall_on_stand(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "fall_on_stand")
    }

    pub fn is_fall_on_pass_under(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "fall_on_pass_under")
    }

    pub fn is_platform(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "platform")
    }

    pub fn is_breakable(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "breakable")
    }

    pub fn is_enemy(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "enemy")
    }

    pub fn is_player_spawn(&self, id: u32) -> Result<bool, TilesetError> {
        self.flag(id, "player_spawn")
    }

    /// Seconds until a fallen or consumed tile returns
    pub fn respawn_time(&self, id: u32) -> Result<Option<f64>, TilesetError> {
        Ok(self.properties_of(id)?.get_float("respawn_time"))
    }

    pub fn damage(&self, id: u32) -> Result<Option<f64>, TilesetError> {
        Ok(self.properties_of(id)?.get_float("damage"))
    }

    pub fn knockback(&self, id: u32) -> Result<Option<f64>, TilesetError> {
        Ok(self.properties_of(id)?.get_float("knockback"))
    }

    pub fn health(&self, id: u32) -> Result<Option<i64>, TilesetError> {
        Ok(self.properties_of(id)?.get_int("health"))
    }

    /// Actor class name for enemy tiles, e.g. `MeleeGhost`
    pub fn actor_type(&self, id: u32) -> Result<Option<&str>, TilesetError> {
        Ok(self.properties_of(id)?.get_str("type"))
    }

    /// Gameplay group of the tile
    pub fn behavior(&self, id: u32) -> Result<TileBehavior, TilesetError> {
        Ok(TileBehavior::classify(self.properties_of(id)?))
    }

    /// Collision description derived from the tile's behavior
    pub fn collision(&self, id: u32) -> Result<CollisionData, TilesetError> {
        Ok(CollisionData::for_behavior(&self.behavior(id)?))
    }

    /// Convert a tile id to (column, row)
    pub fn grid_position(&self, id: u32) -> Option<(u32, u32)> {
        if id >= self.tile_count || self.columns == 0 {
            return None;
        }
        Some((id % self.columns, id / self.columns))
    }

    /// Convert (column, row) to a tile id
    pub fn tile_id_at(&self, column: u32, row: u32) -> Option<u32> {
        if column >= self.columns {
            return None;
        }
        let id = row.checked_mul(self.columns)?.checked_add(column)?;
        (id < self.tile_count).then_some(id)
    }

    /// Pixel rectangle of a tile within the source image
    pub fn source_rect(&self, id: u32) -> Option<TileRect> {
        let (column, row) = self.grid_position(id)?;
        let x = column.checked_mul(self.tile_width.checked_add(self.spacing)?)?;
        let y = row.checked_mul(self.tile_height.checked_add(self.spacing)?)?;
        Some(TileRect {
            x: self.margin.checked_add(x)?,
            y: self.margin.checked_add(y)?,
            width: self.tile_width,
            height: self.tile_height,
        })
    }

    fn flag(&self, id: u32, name: &str) -> Result<bool, TilesetError> {
        Ok(self.properties_of(id)?.flag(name))
    }

    fn check_range(&self, id: u32) -> Result<(), TilesetError> {
        if id >= self.tile_count {
            return Err(TilesetError::OutOfRange {
                id,
                tile_count: self.tile_count,
            });
        }
        Ok(())
    }
}

/// Rows of `tile_height` tiles that fit in `image_height` pixels.
///
/// `None` when the geometry does not fit in `u32`.
pub fn rows_for(image_height: u32, tile_height: u32, margin: u32, spacing: u32) -> Option<u32> {
    let stride = tile_height.checked_add(spacing)?;
    if stride == 0 {
        return Some(0);
    }
    let usable = image_height.saturating_sub(margin.checked_mul(2)?);
    Some(usable.checked_add(spacing)? / stride)
}
