//! Applying the schema to loaded properties

use ether_tiles_core::{PropertyType, TileProperties, Tileset, TilesetError};
use std::fmt;

use crate::{LoaderOptions, PropertySchema, UnknownPropertyPolicy};

/// A non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaWarning {
    pub tile: Option<u32>,
    pub property: String,
    pub message: String,
}

impl fmt::Display for SchemaWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tile {
            Some(id) => write!(f, "tile {}: '{}' {}", id, self.property, self.message),
            None => write!(f, "'{}' {}", self.property, self.message),
        }
    }
}

/// Warnings collected while applying the schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub warnings: Vec<SchemaWarning>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn warn(&mut self, tile: Option<u32>, property: &str, message: String) {
        let warning = SchemaWarning {
            tile,
            property: property.to_string(),
            message,
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

impl PropertySchema {
    /// Normalize and check one tile's properties in place
    pub fn apply(
        &self,
        tile: Option<u32>,
        props: &mut TileProperties,
        options: &LoaderOptions,
        report: &mut ValidationReport,
    ) -> Result<(), TilesetError> {
        for (name, value) in props.iter_mut() {
            let Some(def) = self.get(name) else {
                match options.unknown_properties {
                    UnknownPropertyPolicy::Allow => {}
                    UnknownPropertyPolicy::Warn => {
                        report.warn(tile, name, "is not a recognized property".to_string())
                    }
                    UnknownPropertyPolicy::Reject => {
                        return Err(TilesetError::schema(
                            tile,
                            name,
                            "is not a recognized property",
                        ));
                    }
                }
                continue;
            };

            if options.normalize_numbers
                && def.prop_type == PropertyType::Float
                && value.property_type() == PropertyType::Int
            {
                *value = value.clone().widened();
            }

            let declared = value.property_type();
            if declared != def.prop_type {
                return Err(TilesetError::schema(
                    tile,
                    name,
                    format!("declared as {} but expected {}", declared, def.prop_type),
                ));
            }
        }

        if options.check_dependencies {
            for (name, _) in props.iter() {
                let Some(def) = self.get(name) else {
                    continue;
                };
                if def.requires.is_empty() || def.requires.iter().any(|flag| props.flag(flag)) {
                    continue;
                }
                report.warn(
                    tile,
                    name,
                    format!("has no effect without {}", def.requires.join(" or ")),
                );
            }
        }

        Ok(())
    }

    /// Apply to every declared tile of a tileset
    pub fn apply_to_tileset(
        &self,
        tileset: &mut Tileset,
        options: &LoaderOptions,
    ) -> Result<ValidationReport, TilesetError> {
        let mut report = ValidationReport::default();
        for (id, props) in tileset.tiles.iter_mut() {
            self.apply(Some(*id), props, options, &mut report)?;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertyDef;
    use ether_tiles_core::PropertyValue;

    fn apply(
        props: &mut TileProperties,
        options: &LoaderOptions,
    ) -> Result<ValidationReport, TilesetError> {
        let mut report = ValidationReport::default();
        PropertySchema::builtin().apply(Some(1), props, options, &mut report)?;
        Ok(report)
    }

    #[test]
    fn test_int_damage_is_widened() {
        let mut props = TileProperties::new()
            .with("damage", 1)
            .with("enemy", true)
            .with("health", 3);
        let report = apply(&mut props, &LoaderOptions::default()).unwrap();
        assert!(report.is_clean());
        assert_eq!(props.get("damage"), Some(&PropertyValue::Float(1.0)));
        assert_eq!(props.get("health"), Some(&PropertyValue::Int(3)));
    }

    #[test]
    fn test_without_normalization_int_damage_is_rejected() {
        let mut props = TileProperties::new().with("damage", 1);
        let options = LoaderOptions {
            normalize_numbers: false,
            ..Default::default()
        };
        let err = apply(&mut props, &options).unwrap_err();
        assert!(matches!(err, TilesetError::Schema { ref property, .. } if property == "damage"));
    }

    #[test]
    fn test_float_health_is_rejected() {
        let mut props = TileProperties::new()
            .with("enemy", true)
            .with("health", 3.0);
        assert!(apply(&mut props, &LoaderOptions::default()).is_err());
    }

    #[test]
    fn test_unknown_policy() {
        let mut props = TileProperties::new().with("wobble", true);
        assert!(apply(&mut props, &LoaderOptions::default()).unwrap().is_clean());

        let warn = LoaderOptions {
            unknown_properties: UnknownPropertyPolicy::Warn,
            ..Default::default()
        };
        let report = apply(&mut props, &warn).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].property, "wobble");

        let reject = LoaderOptions {
            unknown_properties: UnknownPropertyPolicy::Reject,
            ..Default::default()
        };
        assert!(apply(&mut props, &reject).is_err());
    }

    #[test]
    fn test_dependency_warning() {
        let mut props = TileProperties::new().with("respawn_time", 5.0);
        let report = apply(&mut props, &LoaderOptions::default()).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings[0].to_string(),
            "tile 1: 'respawn_time' has no effect without fall or healing"
        );

        let mut props = TileProperties::new()
            .with("healing", true)
            .with("respawn_time", 15.0);
        assert!(apply(&mut props, &LoaderOptions::default()).unwrap().is_clean());
    }

    #[test]
    fn test_custom_definition() {
        let mut schema = PropertySchema::builtin();
        schema.insert(PropertyDef::new("speed", PropertyType::Float).requires(&["enemy"]));

        let mut props = TileProperties::new().with("enemy", true).with("speed", 120);
        let mut report = ValidationReport::default();
        schema
            .apply(None, &mut props, &LoaderOptions::default(), &mut report)
            .unwrap();
        assert_eq!(props.get_float("speed"), Some(120.0));
        assert!(report.is_clean());
    }
}
