//! `.tsx` tileset writer

use ether_tiles_core::{PropertyType, TileProperties, Tileset, TilesetError};
use std::io::Write;
use std::path::Path;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

fn write_error(e: xml::writer::Error) -> TilesetError {
    TilesetError::Io(std::io::Error::other(e.to_string()))
}

/// Serialize a tileset to `.tsx` XML in the layout Tiled itself writes
pub fn write_tileset(tileset: &Tileset) -> Result<String, TilesetError> {
    let mut buf = Vec::new();
    write_tileset_to(tileset, &mut buf)?;
    String::from_utf8(buf).map_err(|e| TilesetError::Io(std::io::Error::other(e)))
}

/// Serialize a tileset and write it to `path`
pub fn save_tileset(tileset: &Tileset, path: &Path) -> Result<(), TilesetError> {
    let xml = write_tileset(tileset)?;
    std::fs::write(path, xml)?;
    log::info!("Saved tileset '{}' to {}", tileset.name, path.display());
    Ok(())
}

/// Serialize a tileset into any writer
pub fn write_tileset_to<W: Write>(tileset: &Tileset, sink: W) -> Result<(), TilesetError> {
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .indent_string(" ")
        .create_writer(sink);

    writer
        .write(XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("UTF-8"),
            standalone: None,
        })
        .map_err(write_error)?;

    let tile_width = tileset.tile_width.to_string();
    let tile_height = tileset.tile_height.to_string();
    let tile_count = tileset.tile_count.to_string();
    let columns = tileset.columns.to_string();
    let spacing = tileset.spacing.to_string();
    let margin = tileset.margin.to_string();

    let mut root = XmlEvent::start_element("tileset");
    if let Some(version) = &tileset.version {
        root = root.attr("version", version);
    }
    if let Some(tiled_version) = &tileset.tiled_version {
        root = root.attr("tiledversion", tiled_version);
    }
    root = root
        .attr("name", &tileset.name)
        .attr("tilewidth", &tile_width)
        .attr("tileheight", &tile_height);
    if tileset.spacing != 0 {
        root = root.attr("spacing", &spacing);
    }
    if tileset.margin != 0 {
        root = root.attr("margin", &margin);
    }
    root = root
        .attr("tilecount", &tile_count)
        .attr("columns", &columns);
    writer.write(root).map_err(write_error)?;

    if !tileset.properties.is_empty() {
        write_properties(&mut writer, &tileset.properties)?;
    }

    let image_width = tileset.image.width.to_string();
    let image_height = tileset.image.height.to_string();
    writer
        .write(
            XmlEvent::start_element("image")
                .attr("source", &tileset.image.source)
                .attr("width", &image_width)
                .attr("height", &image_height),
        )
        .map_err(write_error)?;
    writer.write(XmlEvent::end_element()).map_err(write_error)?;

    for (id, props) in tileset.declared_tiles() {
        let id = id.to_string();
        writer
            .write(XmlEvent::start_element("tile").attr("id", &id))
            .map_err(write_error)?;
        write_properties(&mut writer, props)?;
        writer.write(XmlEvent::end_element()).map_err(write_error)?;
    }

    writer.write(XmlEvent::end_element()).map_err(write_error)?;
    Ok(())
}

fn write_properties<W: Write>(
    writer: &mut EventWriter<W>,
    props: &TileProperties,
) -> Result<(), TilesetError> {
    writer
        .write(XmlEvent::start_element("properties"))
        .map_err(write_error)?;
    for (name, value) in props.iter() {
        let literal = value.to_literal();
        let prop_type = value.property_type();
        let mut element = XmlEvent::start_element("property").attr("name", name);
        // Plain strings carry no type attribute
        if prop_type != PropertyType::String {
            element = element.attr("type", prop_type.as_str());
        }
        if literal.contains('\n') {
            writer.write(element).map_err(write_error)?;
            writer
                .write(XmlEvent::characters(&literal))
                .map_err(write_error)?;
        } else {
            writer
                .write(element.attr("value", &literal))
                .map_err(write_error)?;
        }
        writer.write(XmlEvent::end_element()).map_err(write_error)?;
    }
    writer.write(XmlEvent::end_element()).map_err(write_error)?;
    Ok(())
}
