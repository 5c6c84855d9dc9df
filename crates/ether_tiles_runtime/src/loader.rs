//! Asset loader for Tiled `.tsx` tilesets
//!
//! This module provides a Bevy AssetLoader that turns `.tsx` files into
//! [`TilesetAsset`]s. With Bevy's `file_watcher` feature (enabled by this
//! crate's `hot-reload` feature) a tileset saved from Tiled is reloaded while
//! the game runs.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use ether_tiles_runtime::{TilesetAsset, TilesetPlugin};
//!
//! #[derive(Resource)]
//! struct RoomTiles(Handle<TilesetAsset>);
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.insert_resource(RoomTiles(asset_server.load("Rooms/32-32.tsx")));
//! }
//! ```

use bevy::asset::io::Reader;
use bevy::asset::{Asset, AssetLoader, LoadContext};
use bevy::reflect::TypePath;
use ether_tiles_core::{Tileset, TilesetError};
use ether_tiles_tiled::TilesetLoader;
use std::ops::Deref;

/// A loaded tileset with its property index
#[derive(Asset, TypePath, Debug, Clone)]
pub struct TilesetAsset {
    pub tileset: Tileset,
}

impl Deref for TilesetAsset {
    type Target = Tileset;

    fn deref(&self) -> &Tileset {
        &self.tileset
    }
}

/// Asset loader for `.tsx` files
///
/// Properties are normalized with the schema of the wrapped [`TilesetLoader`].
#[derive(Default, TypePath)]
pub struct TsxAssetLoader {
    loader: TilesetLoader,
}

impl TsxAssetLoader {
    pub fn new(loader: TilesetLoader) -> Self {
        Self { loader }
    }
}

impl AssetLoader for TsxAssetLoader {
    type Asset = TilesetAsset;
    type Settings = ();
    type Error = TilesetError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let (tileset, report) = self.loader.parse_reader_with_report(bytes.as_slice())?;
        for warning in &report.warnings {
            bevy::log::warn!("{}: {}", load_context.path(), warning);
        }
        Ok(TilesetAsset { tileset })
    }

    fn extensions(&self) -> &[&str] {
        &["tsx"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions() {
        assert_eq!(TsxAssetLoader::default().extensions(), &["tsx"]);
    }

    #[test]
    fn test_asset_derefs_to_tileset() {
        let tileset = ether_tiles_tiled::parse_tileset(
            r#"<tileset name="t" tilewidth="8" tileheight="8" columns="1">
 <image source="t.png" width="8" height="8"/>
 <tile id="0"><properties><property name="ground" type="bool" value="true"/></properties></tile>
</tileset>"#,
        )
        .unwrap();
        let asset = TilesetAsset { tileset };
        assert!(asset.is_ground(0).unwrap());
        assert_eq!(asset.tile_count, 1);
    }
}
