//! Bevy integration for ether_tiles
//!
//! Registers [`TilesetAsset`] and a `.tsx` loader so tilesets can be loaded
//! through the `AssetServer`. Gameplay systems then query tile properties from
//! `Res<Assets<TilesetAsset>>`.

mod loader;

pub use loader::{TilesetAsset, TsxAssetLoader};

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use ether_tiles_tiled::TilesetLoader;

/// Plugin that makes `.tsx` tilesets loadable as assets
#[derive(Default)]
pub struct TilesetPlugin {
    /// Schema and options used for every loaded tileset
    pub loader: TilesetLoader,
}

impl TilesetPlugin {
    pub fn with_loader(loader: TilesetLoader) -> Self {
        Self { loader }
    }
}

impl Plugin for TilesetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TilesetAsset>()
            .register_asset_loader(TsxAssetLoader::new(self.loader.clone()))
            .add_systems(Update, log_tileset_events);
    }
}

fn log_tileset_events(
    mut events: MessageReader<AssetEvent<TilesetAsset>>,
    tilesets: Res<Assets<TilesetAsset>>,
) {
    for event in events.read() {
        match event {
            AssetEvent::Added { id } => {
                if let Some(asset) = tilesets.get(*id) {
                    info!(
                        "Tileset '{}' ready: {} tiles, {} declared",
                        asset.name,
                        asset.tile_count,
                        asset.tiles.len()
                    );
                }
            }
            AssetEvent::Modified { id } => {
                if let Some(asset) = tilesets.get(*id) {
                    info!("Tileset '{}' reloaded", asset.name);
                }
            }
            _ => {}
        }
    }
}
