//! ether_tiles - Tiled tilesets with typed gameplay properties
//!
//! Load a `.tsx` tileset once, then ask what each tile is:
//!
//! ```rust,ignore
//! use ether_tiles::prelude::*;
//!
//! let tileset = load_tileset("Rooms/32-32.tsx".as_ref())?;
//! assert!(tileset.is_collidable(8)? && tileset.is_ground(8)?);
//!
//! let ghost = tileset.properties_of(62)?;
//! assert_eq!(ghost.get_str("type"), Some("MeleeGhost"));
//! assert_eq!(ghost.get_int("health"), Some(3));
//! ```
//!
//! # Crates
//!
//! - [`core`] - `Tileset`, property values, behaviors and collision
//! - [`schema`] - recognized properties, normalization and `ether_tiles.toml`
//! - [`tiled`] - `.tsx` reading and writing, `.tmx` levels
//! - `runtime` (feature `runtime`) - Bevy `AssetLoader` for `.tsx`

pub use ether_tiles_core as core;
pub use ether_tiles_schema as schema;
pub use ether_tiles_tiled as tiled;

#[cfg(feature = "runtime")]
pub use ether_tiles_runtime as runtime;

pub mod prelude {
    pub use ether_tiles_core::{
        CollisionData, PropertyType, PropertyValue, TileBehavior, TileProperties, Tileset,
        TilesetError,
    };
    pub use ether_tiles_schema::{LoaderOptions, PropertySchema, SchemaConfig};
    pub use ether_tiles_tiled::{
        load_level, load_tileset, parse_tileset, write_tileset, LevelLayout, LevelSummary,
        TilesetLoader,
    };

    #[cfg(feature = "runtime")]
    pub use ether_tiles_runtime::{TilesetAsset, TilesetPlugin};
}
