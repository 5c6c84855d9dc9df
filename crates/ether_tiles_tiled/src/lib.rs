//! Tiled file formats for ether_tiles
//!
//! Reads `.tsx` tilesets into a [`Tileset`] with typed, schema-normalized
//! tile properties, writes them back out, and reads `.tmx` levels built from
//! those tilesets.
//!
//! # Example
//!
//! ```rust,ignore
//! use ether_tiles_tiled::load_tileset;
//!
//! let tileset = load_tileset("Rooms/32-32.tsx".as_ref())?;
//! assert!(tileset.is_collidable(8)?);
//! assert!(tileset.properties_of(0)?.is_empty());
//! ```

mod level;
mod loader;
mod tsx;
mod writer;
mod xml_util;

pub use level::{
    load_level, parse_level, LevelLayout, LevelSummary, LevelTileset, Placed, TileLayer,
    TilePlacement, DEFAULT_PLAYER_SPAWN,
};
pub use loader::TilesetLoader;
pub use writer::{save_tileset, write_tileset, write_tileset_to};

pub use ether_tiles_core::{Tileset, TilesetError};

use std::path::Path;

/// Parse `.tsx` XML with the builtin schema
pub fn parse_tileset(xml: &str) -> Result<Tileset, TilesetError> {
    TilesetLoader::default().parse_str(xml)
}

/// Load a `.tsx` file with the builtin schema
pub fn load_tileset(path: &Path) -> Result<Tileset, TilesetError> {
    TilesetLoader::default().load(path)
}
