//! Core data structures for ether_tiles
//!
//! This crate provides the in-memory model of a Tiled tileset annotated with
//! gameplay metadata:
//! - `Tileset` - Grid of tiles sliced from one image, with a sparse property index
//! - `TileProperties` - Typed properties declared on a tile
//! - `PropertyValue` - Bool, int, float or textual property value
//! - `TileBehavior` - Gameplay group a tile belongs to
//! - `CollisionData` - How an engine should collide with a tile
//! - `TilesetError` - Loading and query errors

mod behavior;
mod collision;
mod error;
mod tileset;
mod value;

pub use behavior::{
    BreakableTile, EnemySpawn, FallingTile, HealingTile, StaticTile, TileBehavior,
    DEFAULT_BREAKABLE_HEALTH, DEFAULT_FALL_RESPAWN_SECS, DEFAULT_HEALING_RESPAWN_SECS,
};
pub use collision::{CollisionData, CollisionShape, OneWayDirection};
pub use error::TilesetError;
pub use tileset::{rows_for, TileProperties, TileRect, Tileset, TilesetImage};
pub use value::{PropertyType, PropertyValue};
