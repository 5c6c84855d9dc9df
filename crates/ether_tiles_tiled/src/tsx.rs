//! `.tsx` tileset reader
//!
//! Produces a [`Tileset`] whose literals have been checked against their type
//! tags. Schema normalization happens afterwards in the loader.

use ether_tiles_core::{
    rows_for, PropertyType, PropertyValue, TileProperties, Tileset, TilesetError, TilesetImage,
};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use xml::attribute::OwnedAttribute;
use xml::reader::EventReader;

use crate::xml_util::{parse_tag, read_text, root_element, skip_element, Attrs};

/// Parse a whole `.tsx` document
pub(crate) fn read_tileset<R: Read>(reader: R) -> Result<Tileset, TilesetError> {
    let mut parser = EventReader::new(reader);
    let (name, attrs) = root_element(&mut parser)?;
    if name != "tileset" {
        return Err(TilesetError::malformed(format!(
            "expected <tileset> root element, found <{}>",
            name
        )));
    }
    parse_tileset_element(&mut parser, attrs)
}

/// Parse a `<tileset>` element whose start tag has just been read.
///
/// Shared by standalone `.tsx` files and tilesets embedded in a `.tmx` map.
pub(crate) fn parse_tileset_element<R: Read>(
    parser: &mut EventReader<R>,
    attrs: Vec<OwnedAttribute>,
) -> Result<Tileset, TilesetError> {
    let attrs = Attrs::new("tileset", attrs);
    let name = attrs.get("name").unwrap_or_default().to_string();
    let tile_width: u32 = attrs.required("tilewidth")?;
    let tile_height: u32 = attrs.required("tileheight")?;
    let columns: u32 = attrs.required("columns")?;
    let declared_count: Option<u32> = attrs.optional("tilecount")?;
    let spacing: u32 = attrs.optional("spacing")?.unwrap_or(0);
    let margin: u32 = attrs.optional("margin")?.unwrap_or(0);
    let version = attrs.get("version").map(str::to_string);
    let tiled_version = attrs.get("tiledversion").map(str::to_string);

    if tile_width == 0 || tile_height == 0 {
        return Err(TilesetError::malformed(format!(
            "tileset '{}' has a zero tile dimension ({}x{})",
            name, tile_width, tile_height
        )));
    }
    if columns == 0 {
        return Err(TilesetError::malformed(format!(
            "tileset '{}' has zero columns",
            name
        )));
    }

    let mut image = None;
    let mut properties = TileProperties::new();
    let mut raw_tiles: Vec<(u32, TileProperties)> = Vec::new();

    parse_tag(parser, "tileset", |parser, child, child_attrs| match child {
        "image" => {
            let attrs = Attrs::new("image", child_attrs);
            image = Some(TilesetImage {
                source: attrs.required_str("source")?.to_string(),
                width: attrs.required("width")?,
                height: attrs.required("height")?,
            });
            skip_element(parser)
        }
        "tile" => {
            let attrs = Attrs::new("tile", child_attrs);
            let id: u32 = attrs.required("id")?;
            let props = parse_tile(parser, id)?;
            raw_tiles.push((id, props));
            Ok(())
        }
        "properties" => {
            properties = parse_properties(parser, None)?;
            Ok(())
        }
        // tileoffset, grid, wangsets, transformations
        _ => skip_element(parser),
    })?;

    let image = image.ok_or_else(|| {
        TilesetError::malformed(format!("tileset '{}' has no <image> element", name))
    })?;

    let overflow = || {
        TilesetError::malformed(format!(
            "tileset '{}' grid does not fit in 32 bits (columns {}, spacing {}, margin {})",
            name, columns, spacing, margin
        ))
    };
    let rows = rows_for(image.height, tile_height, margin, spacing).ok_or_else(overflow)?;
    let derived_count = columns.checked_mul(rows).ok_or_else(overflow)?;
    let tile_count = match declared_count {
        Some(count) if count != derived_count => {
            return Err(TilesetError::malformed(format!(
                "tileset '{}' declares tilecount {} but {} columns x {} rows = {}",
                name, count, columns, rows, derived_count
            )));
        }
        Some(count) => count,
        None => derived_count,
    };

    let mut tiles = BTreeMap::new();
    let mut seen = BTreeSet::new();
    for (id, props) in raw_tiles {
        if id >= tile_count {
            return Err(TilesetError::malformed(format!(
                "tile id {} is outside tileset '{}' ({} tiles)",
                id, name, tile_count
            )));
        }
        if !seen.insert(id) {
            return Err(TilesetError::malformed(format!(
                "tile id {} is declared more than once",
                id
            )));
        }
        if !props.is_empty() {
            tiles.insert(id, props);
        }
    }

    Ok(Tileset {
        name,
        tile_width,
        tile_height,
        tile_count,
        columns,
        spacing,
        margin,
        image,
        version,
        tiled_version,
        properties,
        tiles,
    })
}

/// Parse the children of a `<tile>` element
fn parse_tile<R: Read>(
    parser: &mut EventReader<R>,
    id: u32,
) -> Result<TileProperties, TilesetError> {
    let mut props = TileProperties::new();
    parse_tag(parser, "tile", |parser, child, _| match child {
        "properties" => {
            props = parse_properties(parser, Some(id))?;
            Ok(())
        }
        // image (collection tilesets), objectgroup, animation
        _ => skip_element(parser),
    })?;
    Ok(props)
}

/// Parse a `<properties>` block
fn parse_properties<R: Read>(
    parser: &mut EventReader<R>,
    tile: Option<u32>,
) -> Result<TileProperties, TilesetError> {
    let mut props = TileProperties::new();
    parse_tag(parser, "properties", |parser, child, attrs| {
        if child != "property" {
            return skip_element(parser);
        }
        let (name, value) = parse_property(parser, Attrs::new("property", attrs), tile)?;
        if props.contains(&name) {
            return Err(TilesetError::malformed(format!(
                "property '{}' is declared more than once{}",
                name,
                tile.map(|id| format!(" on tile {}", id)).unwrap_or_default()
            )));
        }
        props.insert(name, value);
        Ok(())
    })?;
    Ok(props)
}

fn parse_property<R: Read>(
    parser: &mut EventReader<R>,
    attrs: Attrs,
    tile: Option<u32>,
) -> Result<(String, PropertyValue), TilesetError> {
    let name = attrs.required_str("name")?.to_string();
    let prop_type = match attrs.get("type") {
        None => PropertyType::String,
        Some(tag) => tag
            .parse::<PropertyType>()
            .map_err(|msg| TilesetError::schema(tile, &name, msg))?,
    };

    // Multi-line strings are stored as element text instead of an attribute
    let text = read_text(parser, "property", |parser, _| skip_element(parser))?;
    let literal = attrs.get("value").map(str::to_string).unwrap_or(text);

    let value = PropertyValue::parse(prop_type, &literal)
        .map_err(|msg| TilesetError::schema(tile, &name, msg))?;
    log::trace!("tile {:?}: {} = {:?}", tile, name, value);
    Ok((name, value))
}
