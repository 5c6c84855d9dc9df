//! Tileset loading with schema application

use ether_tiles_core::{Tileset, TilesetError};
use ether_tiles_schema::{LoaderOptions, PropertySchema, SchemaConfig, ValidationReport};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::level::{load_level, LevelLayout};
use crate::tsx::read_tileset;

/// Loads `.tsx` documents into a queryable [`Tileset`].
///
/// Loading is one-shot: it either yields a fully normalized tileset or fails.
#[derive(Debug, Clone)]
pub struct TilesetLoader {
    schema: PropertySchema,
    options: LoaderOptions,
}

impl Default for TilesetLoader {
    fn default() -> Self {
        Self::new(PropertySchema::builtin(), LoaderOptions::default())
    }
}

impl TilesetLoader {
    pub fn new(schema: PropertySchema, options: LoaderOptions) -> Self {
        Self { schema, options }
    }

    /// Loader configured from an `ether_tiles.toml`
    pub fn from_config(config: &SchemaConfig) -> Self {
        Self::new(config.to_schema(), config.loader.clone())
    }

    pub fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    pub fn parse_str(&self, xml: &str) -> Result<Tileset, TilesetError> {
        self.parse_str_with_report(xml).map(|(tileset, _)| tileset)
    }

    /// Parse and also return the schema warnings
    pub fn parse_str_with_report(
        &self,
        xml: &str,
    ) -> Result<(Tileset, ValidationReport), TilesetError> {
        self.parse_reader_with_report(xml.as_bytes())
    }

    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Tileset, TilesetError> {
        self.parse_reader(bytes)
    }

    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Tileset, TilesetError> {
        self.parse_reader_with_report(reader).map(|(tileset, _)| tileset)
    }

    pub fn parse_reader_with_report<R: Read>(
        &self,
        reader: R,
    ) -> Result<(Tileset, ValidationReport), TilesetError> {
        let mut tileset = read_tileset(reader)?;
        let report = self.finish(&mut tileset)?;
        Ok((tileset, report))
    }

    /// Load a `.tsx` file from disk
    pub fn load(&self, path: &Path) -> Result<Tileset, TilesetError> {
        self.load_with_report(path).map(|(tileset, _)| tileset)
    }

    pub fn load_with_report(
        &self,
        path: &Path,
    ) -> Result<(Tileset, ValidationReport), TilesetError> {
        log::debug!("Loading tileset {}", path.display());
        let file = File::open(path)?;
        self.parse_reader_with_report(BufReader::new(file))
    }

    /// Load a `.tmx` level and every tileset it references
    pub fn load_level(&self, path: &Path) -> Result<LevelLayout, TilesetError> {
        load_level(path, self)
    }

    /// Apply the schema to a freshly parsed tileset
    pub(crate) fn finish(&self, tileset: &mut Tileset) -> Result<ValidationReport, TilesetError> {
        let report = self.schema.apply_to_tileset(tileset, &self.options)?;
        log::info!(
            "Loaded tileset '{}': {}x{} tiles of {}x{}px, {} declared, {} warnings",
            tileset.name,
            tileset.columns,
            tileset.rows(),
            tileset.tile_width,
            tileset.tile_height,
            tileset.tiles.len(),
            report.warnings.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ether_tiles_core::PropertyValue;
    use ether_tiles_schema::UnknownPropertyPolicy;

    const MIXED_DAMAGE: &str = r#"<tileset name="t" tilewidth="16" tileheight="16" columns="2">
 <image source="t.png" width="32" height="32"/>
 <tile id="0"><properties><property name="damage" type="float" value="1"/></properties></tile>
 <tile id="1"><properties><property name="damage" type="int" value="1"/></properties></tile>
 <tile id="2"><properties><property name="glow" type="bool" value="true"/></properties></tile>
</tileset>"#;

    #[test]
    fn test_damage_normalized_to_float() {
        let tileset = TilesetLoader::default().parse_str(MIXED_DAMAGE).unwrap();
        assert_eq!(tileset.tiles[&0].get("damage"), Some(&PropertyValue::Float(1.0)));
        assert_eq!(tileset.tiles[&1].get("damage"), Some(&PropertyValue::Float(1.0)));
    }

    #[test]
    fn test_unknown_rejected_by_config() {
        let config = SchemaConfig::from_toml_str(
            r#"
[loader]
unknown_properties = "reject"
"#,
        )
        .unwrap();
        let loader = TilesetLoader::from_config(&config);
        assert_eq!(loader.options().unknown_properties, UnknownPropertyPolicy::Reject);
        let err = loader.parse_str(MIXED_DAMAGE).unwrap_err();
        assert!(matches!(err, TilesetError::Schema { tile: Some(2), .. }));
    }

    #[test]
    fn test_report_collects_warnings() {
        let config = SchemaConfig::from_toml_str(
            r#"
[loader]
unknown_properties = "warn"
"#,
        )
        .unwrap();
        let (_, report) = TilesetLoader::from_config(&config)
            .parse_str_with_report(MIXED_DAMAGE)
            .unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].tile, Some(2));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TilesetLoader::default()
            .load(Path::new("does/not/exist.tsx"))
            .unwrap_err();
        assert!(matches!(err, TilesetError::Io(_)));
    }
}
