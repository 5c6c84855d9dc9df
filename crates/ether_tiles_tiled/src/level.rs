//! `.tmx` level reader
//!
//! Reads orthogonal maps with CSV-encoded tile layers and resolves every placed
//! global id to a tile of one of the map's tilesets. The resulting
//! [`LevelLayout`] can be grouped into gameplay sets with
//! [`LevelLayout::summary`].

use ether_tiles_core::{
    BreakableTile, EnemySpawn, FallingTile, HealingTile, StaticTile, TileBehavior, Tileset,
    TilesetError,
};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use xml::reader::EventReader;

use crate::loader::TilesetLoader;
use crate::tsx::parse_tileset_element;
use crate::xml_util::{parse_tag, read_text, root_element, skip_element, Attrs};

/// Tiled stores horizontal, vertical and diagonal flips in the top bits of a gid
const FLIP_FLAGS: u32 = 0xE000_0000;

/// Where the player appears when the level places no spawn tile
pub const DEFAULT_PLAYER_SPAWN: [u32; 2] = [100, 100];

/// A tileset referenced by a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTileset {
    pub first_gid: u32,
    /// Path of the external `.tsx`, `None` when embedded in the map
    pub source: Option<String>,
    pub tileset: Tileset,
}

/// One tile layer, row-major, flip bits removed
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub gids: Vec<u32>,
}

impl TileLayer {
    pub fn gid_at(&self, column: u32, row: u32) -> Option<u32> {
        if column >= self.width || row >= self.height {
            return None;
        }
        let index = row as usize * self.width as usize + column as usize;
        self.gids.get(index).copied()
    }
}

/// A parsed level: its grid, tilesets and tile layers
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Sorted by `first_gid`
    pub tilesets: Vec<LevelTileset>,
    pub layers: Vec<TileLayer>,
}

/// A non-empty cell of a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub layer: usize,
    pub column: u32,
    pub row: u32,
    /// Top-left corner in pixels
    pub position: [u32; 2],
    /// Index into [`LevelLayout::tilesets`]
    pub tileset: usize,
    pub tile_id: u32,
}

/// Something placed at a pixel position
#[derive(Debug, Clone, PartialEq)]
pub struct Placed<T> {
    pub position: [u32; 2],
    pub tile: T,
}

/// Placed tiles grouped by gameplay behavior
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSummary {
    /// Level width in pixels
    pub width: u32,
    /// Level height in pixels
    pub height: u32,
    pub player_spawn: [u32; 2],
    pub enemies: Vec<Placed<EnemySpawn>>,
    pub collectables: Vec<[u32; 2]>,
    pub falling: Vec<Placed<FallingTile>>,
    pub breakable: Vec<Placed<BreakableTile>>,
    pub healing: Vec<Placed<HealingTile>>,
    /// Solid static tiles and solid breakables
    pub obstacles: Vec<[u32; 2]>,
    pub platforms: Vec<[u32; 2]>,
    /// Everything drawn once into the static background, plain tiles included
    pub static_tiles: Vec<Placed<StaticTile>>,
}

impl LevelSummary {
    fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            player_spawn: DEFAULT_PLAYER_SPAWN,
            enemies: Vec::new(),
            collectables: Vec::new(),
            falling: Vec::new(),
            breakable: Vec::new(),
            healing: Vec::new(),
            obstacles: Vec::new(),
            platforms: Vec::new(),
            static_tiles: Vec::new(),
        }
    }
}

impl LevelLayout {
    /// Level width in pixels. Parsed levels are checked to fit in `u32`.
    pub fn pixel_width(&self) -> u32 {
        self.width.saturating_mul(self.tile_width)
    }

    /// Level height in pixels
    pub fn pixel_height(&self) -> u32 {
        self.height.saturating_mul(self.tile_height)
    }

    /// Map a global id to (tileset index, local tile id)
    pub fn resolve(&self, gid: u32) -> Option<(usize, u32)> {
        let gid = gid & !FLIP_FLAGS;
        if gid == 0 {
            return None;
        }
        let index = self
            .tilesets
            .iter()
            .rposition(|entry| entry.first_gid <= gid)?;
        let local = gid - self.tilesets[index].first_gid;
        (local < self.tilesets[index].tileset.tile_count).then_some((index, local))
    }

    /// Every non-empty cell of every layer, layer by layer in row-major order
    pub fn placements(&self) -> impl Iterator<Item = TilePlacement> + '_ {
        self.layers
            .iter()
            .enumerate()
            .flat_map(move |(layer_index, layer)| {
                layer
                    .gids
                    .iter()
                    .enumerate()
                    .filter(|(_, gid)| **gid != 0)
                    .filter_map(move |(cell, gid)| {
                        let (tileset, tile_id) = self.resolve(*gid)?;
                        let width = layer.width as usize;
                        let column = (cell % width) as u32;
                        let row = (cell / width) as u32;
                        Some(TilePlacement {
                            layer: layer_index,
                            column,
                            row,
                            position: [
                                column.saturating_mul(self.tile_width),
                                row.saturating_mul(self.tile_height),
                            ],
                            tileset,
                            tile_id,
                        })
                    })
            })
    }

    /// Behavior of a placed tile
    pub fn behavior_of(&self, placement: &TilePlacement) -> Result<TileBehavior, TilesetError> {
        self.tilesets
            .get(placement.tileset)
            .ok_or_else(|| {
                TilesetError::malformed(format!("no tileset at index {}", placement.tileset))
            })?
            .tileset
            .behavior(placement.tile_id)
    }

    /// Group every placed tile by its behavior
    pub fn summary(&self) -> LevelSummary {
        let mut summary = LevelSummary::empty(self.pixel_width(), self.pixel_height());

        for placement in self.placements() {
            let position = placement.position;
            // Placements are resolved against loaded tilesets, so this cannot miss
            let Ok(behavior) = self.behavior_of(&placement) else {
                continue;
            };
            match behavior {
                TileBehavior::PlayerSpawn => summary.player_spawn = position,
                TileBehavior::Enemy(tile) => summary.enemies.push(Placed { position, tile }),
                TileBehavior::Collectable => summary.collectables.push(position),
                TileBehavior::Falling(tile) => summary.falling.push(Placed { position, tile }),
                TileBehavior::Breakable(tile) => {
                    if tile.collidable {
                        summary.obstacles.push(position);
                    }
                    summary.breakable.push(Placed { position, tile });
                }
                TileBehavior::Healing(tile) => summary.healing.push(Placed { position, tile }),
                TileBehavior::Static(tile) => {
                    if tile.collidable {
                        summary.obstacles.push(position);
                    }
                    if tile.platform {
                        summary.platforms.push(position);
                    }
                    summary.static_tiles.push(Placed { position, tile });
                }
                TileBehavior::Plain => summary.static_tiles.push(Placed {
                    position,
                    tile: StaticTile::default(),
                }),
            }
        }

        log::debug!(
            "Level summary: {} enemies, {} collectables, {} obstacles, {} static tiles",
            summary.enemies.len(),
            summary.collectables.len(),
            summary.obstacles.len(),
            summary.static_tiles.len()
        );
        summary
    }
}

/// Load a `.tmx` file. External tilesets are resolved relative to its directory.
pub fn load_level(path: &Path, loader: &TilesetLoader) -> Result<LevelLayout, TilesetError> {
    log::debug!("Loading level {}", path.display());
    let file = File::open(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let level = parse_level(BufReader::new(file), base_dir, loader)?;
    log::info!(
        "Loaded level {}: {}x{} tiles, {} tilesets, {} layers",
        path.display(),
        level.width,
        level.height,
        level.tilesets.len(),
        level.layers.len()
    );
    Ok(level)
}

/// Parse a `.tmx` document. `base_dir` anchors external tileset paths.
pub fn parse_level<R: Read>(
    reader: R,
    base_dir: &Path,
    loader: &TilesetLoader,
) -> Result<LevelLayout, TilesetError> {
    let mut parser = EventReader::new(reader);
    let (root, attrs) = root_element(&mut parser)?;
    if root != "map" {
        return Err(TilesetError::malformed(format!(
            "expected <map> root element, found <{}>",
            root
        )));
    }

    let attrs = Attrs::new("map", attrs);
    if attrs.optional::<u8>("infinite")?.unwrap_or(0) != 0 {
        return Err(TilesetError::malformed("infinite maps are not supported"));
    }
    let width: u32 = attrs.required("width")?;
    let height: u32 = attrs.required("height")?;
    let tile_width: u32 = attrs.required("tilewidth")?;
    let tile_height: u32 = attrs.required("tileheight")?;
    if width.checked_mul(tile_width).is_none() || height.checked_mul(tile_height).is_none() {
        return Err(TilesetError::malformed(format!(
            "map of {}x{} tiles of {}x{} px does not fit in 32-bit pixel coordinates",
            width, height, tile_width, tile_height
        )));
    }

    let mut tilesets = Vec::new();
    let mut layers = Vec::new();

    parse_tag(&mut parser, "map", |parser, child, child_attrs| match child {
        "tileset" => {
            let attrs = Attrs::new("tileset", child_attrs.clone());
            let first_gid: u32 = attrs.required("firstgid")?;
            if first_gid == 0 {
                return Err(TilesetError::malformed("tileset firstgid must be at least 1"));
            }
            let entry = match attrs.get("source") {
                Some(source) => {
                    skip_element(parser)?;
                    LevelTileset {
                        first_gid,
                        source: Some(source.to_string()),
                        tileset: loader.load(&base_dir.join(source))?,
                    }
                }
                None => {
                    let mut tileset = parse_tileset_element(parser, child_attrs)?;
                    loader.finish(&mut tileset)?;
                    LevelTileset {
                        first_gid,
                        source: None,
                        tileset,
                    }
                }
            };
            tilesets.push(entry);
            Ok(())
        }
        "layer" => {
            let attrs = Attrs::new("layer", child_attrs);
            let name = attrs.get("name").unwrap_or_default().to_string();
            let layer_width = attrs.optional("width")?.unwrap_or(width);
            let layer_height = attrs.optional("height")?.unwrap_or(height);
            if layer_width > width || layer_height > height {
                return Err(TilesetError::malformed(format!(
                    "layer '{}' ({}x{}) is larger than the map ({}x{})",
                    name, layer_width, layer_height, width, height
                )));
            }
            let gids = parse_layer_data(parser, &name)?;
            let expected = layer_width as usize * layer_height as usize;
            if gids.len() != expected {
                return Err(TilesetError::malformed(format!(
                    "layer '{}' has {} cells, expected {}x{}",
                    name,
                    gids.len(),
                    layer_width,
                    layer_height
                )));
            }
            layers.push(TileLayer {
                name,
                width: layer_width,
                height: layer_height,
                gids,
            });
            Ok(())
        }
        _ => skip_element(parser),
    })?;

    tilesets.sort_by_key(|entry| entry.first_gid);
    if let Some(pair) = tilesets
        .windows(2)
        .find(|pair| pair[0].first_gid == pair[1].first_gid)
    {
        return Err(TilesetError::malformed(format!(
            "two tilesets share firstgid {}",
            pair[0].first_gid
        )));
    }

    let level = LevelLayout {
        width,
        height,
        tile_width,
        tile_height,
        tilesets,
        layers,
    };

    for layer in &level.layers {
        if let Some(gid) = layer
            .gids
            .iter()
            .find(|gid| **gid != 0 && level.resolve(**gid).is_none())
        {
            return Err(TilesetError::malformed(format!(
                "layer '{}' references gid {} which belongs to no tileset",
                layer.name, gid
            )));
        }
    }

    Ok(level)
}

/// Read the `<data>` child of a `<layer>` until the layer closes
fn parse_layer_data<R: Read>(
    parser: &mut EventReader<R>,
    layer: &str,
) -> Result<Vec<u32>, TilesetError> {
    let mut gids = None;
    parse_tag(parser, "layer", |parser, child, child_attrs| match child {
        "data" => {
            let attrs = Attrs::new("data", child_attrs);
            match attrs.get("encoding") {
                Some("csv") => {}
                Some(other) => {
                    return Err(TilesetError::malformed(format!(
                        "layer '{}' uses unsupported encoding '{}'",
                        layer, other
                    )))
                }
                None => {
                    return Err(TilesetError::malformed(format!(
                        "layer '{}' stores tiles as XML elements, only csv is supported",
                        layer
                    )))
                }
            }
            if let Some(compression) = attrs.get("compression") {
                return Err(TilesetError::malformed(format!(
                    "layer '{}' uses unsupported compression '{}'",
                    layer, compression
                )));
            }
            let text = read_text(parser, "data", |_, name| {
                Err(TilesetError::malformed(format!(
                    "unexpected <{}> inside csv data of layer '{}'",
                    name, layer
                )))
            })?;
            gids = Some(parse_csv(&text, layer)?);
            Ok(())
        }
        _ => skip_element(parser),
    })?;
    gids.ok_or_else(|| TilesetError::malformed(format!("layer '{}' has no <data>", layer)))
}

fn parse_csv(text: &str, layer: &str) -> Result<Vec<u32>, TilesetError> {
    text.split(',')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            cell.parse::<u32>()
                .map(|gid| gid & !FLIP_FLAGS)
                .map_err(|_| {
                    TilesetError::malformed(format!(
                        "layer '{}' has invalid cell '{}'",
                        layer, cell
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="orthogonal" renderorder="right-down" width="4" height="2" tilewidth="16" tileheight="16" infinite="0">
 <tileset firstgid="1" name="mini" tilewidth="16" tileheight="16" tilecount="4" columns="2">
  <image source="mini.png" width="32" height="32"/>
  <tile id="0"><properties><property name="collidable" type="bool" value="true"/><property name="ground" type="bool" value="true"/></properties></tile>
  <tile id="1"><properties><property name="player_spawn" type="bool" value="true"/></properties></tile>
  <tile id="2"><properties><property name="breakable" type="bool" value="true"/></properties></tile>
 </tileset>
 <layer id="1" name="Tiles" width="4" height="2">
  <data encoding="csv">
0,2,0,4,
1,1,3,2147483649
</data>
 </layer>
 <objectgroup id="2" name="Notes"/>
</map>"#;

    fn parse(xml: &str) -> Result<LevelLayout, TilesetError> {
        parse_level(xml.as_bytes(), Path::new("."), &TilesetLoader::default())
    }

    #[test]
    fn test_parse_embedded() {
        let level = parse(LEVEL).unwrap();
        assert_eq!((level.width, level.height), (4, 2));
        assert_eq!(level.tilesets.len(), 1);
        assert_eq!(level.tilesets[0].source, None);
        assert_eq!(level.layers[0].gids, vec![0, 2, 0, 4, 1, 1, 3, 1]);
        assert_eq!(level.layers[0].gid_at(3, 1), Some(1));
    }

    #[test]
    fn test_resolve() {
        let level = parse(LEVEL).unwrap();
        assert_eq!(level.resolve(0), None);
        assert_eq!(level.resolve(1), Some((0, 0)));
        assert_eq!(level.resolve(4), Some((0, 3)));
        assert_eq!(level.resolve(5), None);
        assert_eq!(level.resolve(0x8000_0002), Some((0, 1)));
    }

    #[test]
    fn test_summary_groups() {
        let summary = parse(LEVEL).unwrap().summary();
        assert_eq!((summary.width, summary.height), (64, 32));
        assert_eq!(summary.player_spawn, [16, 0]);
        assert_eq!(summary.breakable.len(), 1);
        assert_eq!(summary.breakable[0].position, [32, 16]);
        // three ground tiles plus the breakable
        assert_eq!(summary.obstacles.len(), 4);
        // ground tiles and the plain tile 3
        assert_eq!(summary.static_tiles.len(), 4);
        assert!(summary.enemies.is_empty());
    }

    #[test]
    fn test_default_spawn() {
        let xml = LEVEL.replace("0,2,0,4", "0,1,0,4");
        let summary = parse(&xml).unwrap().summary();
        assert_eq!(summary.player_spawn, DEFAULT_PLAYER_SPAWN);
    }

    #[test]
    fn test_unknown_gid() {
        let xml = LEVEL.replace("0,2,0,4", "0,2,0,9");
        assert!(matches!(parse(&xml), Err(TilesetError::MalformedAsset(_))));
    }

    #[test]
    fn test_cell_count_mismatch() {
        let xml = LEVEL.replace("0,2,0,4,", "0,2,0,");
        assert!(matches!(parse(&xml), Err(TilesetError::MalformedAsset(_))));
    }

    #[test]
    fn test_base64_rejected() {
        let xml = LEVEL.replace(r#"encoding="csv""#, r#"encoding="base64""#);
        let err = parse(&xml).unwrap_err();
        assert!(err.to_string().contains("base64"));
    }

    #[test]
    fn test_not_a_map() {
        assert!(matches!(
            parse("<tileset tilewidth=\"1\" tileheight=\"1\" columns=\"1\"/>"),
            Err(TilesetError::MalformedAsset(_))
        ));
    }

    #[test]
    fn test_pixel_size_overflow_is_malformed() {
        let xml = r#"<map width="70000" height="1" tilewidth="70000" tileheight="1"/>"#;
        assert!(matches!(parse(xml), Err(TilesetError::MalformedAsset(_))));

        let xml = r#"<map width="1" height="70000" tilewidth="1" tileheight="70000"/>"#;
        assert!(matches!(parse(xml), Err(TilesetError::MalformedAsset(_))));
    }

    #[test]
    fn test_layer_larger_than_map() {
        let xml = LEVEL.replace(
            r#"name="Tiles" width="4" height="2""#,
            r#"name="Tiles" width="8" height="1""#,
        );
        let err = parse(&xml).unwrap_err();
        assert!(err.to_string().contains("larger than the map"));
    }

    #[test]
    fn test_large_level_summarizes() {
        let xml = r#"<map width="2" height="1" tilewidth="2147483647" tileheight="16">
 <tileset firstgid="1" name="one" tilewidth="16" tileheight="16" columns="1">
  <image source="one.png" width="16" height="16"/>
 </tileset>
 <layer name="Tiles"><data encoding="csv">1,1</data></layer>
</map>"#;
        let summary = parse(xml).unwrap().summary();
        assert_eq!(summary.width, u32::MAX - 1);
        assert_eq!(summary.static_tiles[1].position, [2147483647, 0]);
    }
}
