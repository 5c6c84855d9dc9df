//! Loader configuration, read from `ether_tiles.toml`
//!
//! ```toml
//! [loader]
//! normalize_numbers = true
//! unknown_properties = "warn"
//!
//! [[properties]]
//! name = "speed"
//! prop_type = "float"
//! requires = ["enemy"]
//! ```

use ether_tiles_core::PropertyType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::{ConfigError, PropertyDef, PropertySchema};

/// File name searched for by [`SchemaConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "ether_tiles.toml";

/// What to do with a property the schema does not know
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPropertyPolicy {
    /// Keep it silently
    #[default]
    Allow,
    /// Keep it and record a warning
    Warn,
    /// Fail the load with a schema error
    Reject,
}

/// Options that control how properties are checked at load time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoaderOptions {
    /// Widen int-tagged values of float properties
    pub normalize_numbers: bool,
    pub unknown_properties: UnknownPropertyPolicy,
    /// Warn about numeric properties whose flag is not set
    pub check_dependencies: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            normalize_numbers: true,
            unknown_properties: UnknownPropertyPolicy::Allow,
            check_dependencies: true,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaConfig {
    #[serde(default)]
    pub loader: LoaderOptions,
    /// Extra or overriding property definitions
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
}

impl SchemaConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SchemaConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the first config file found in the default locations, or the
    /// defaults when there is none.
    pub fn discover() -> Result<Self, ConfigError> {
        Self::discover_in(&Self::search_paths())
    }

    /// Load the first existing file among `candidates`
    pub fn discover_in(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::load(path),
            None => {
                log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default())
            }
        }
    }

    /// Searched in order: current directory, `$XDG_CONFIG_HOME/ether_tiles/`,
    /// then the platform config directory.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("ether_tiles").join(CONFIG_FILE_NAME));
        }

        #[cfg(target_os = "linux")]
        {
            if let Ok(home) = std::env::var("HOME") {
                paths.push(PathBuf::from(home).join(".config/ether_tiles").join(CONFIG_FILE_NAME));
            }
        }

        #[cfg(target_os = "macos")]
        {
            if let Ok(home) = std::env::var("HOME") {
                paths.push(
                    PathBuf::from(home)
                        .join("Library/Application Support/ether_tiles")
                        .join(CONFIG_FILE_NAME),
                );
            }
        }

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                paths.push(PathBuf::from(appdata).join("ether_tiles").join(CONFIG_FILE_NAME));
            }
        }

        paths
    }

    /// Builtin schema with this config's definitions merged over it
    pub fn to_schema(&self) -> PropertySchema {
        let mut schema = PropertySchema::builtin();
        for def in &self.properties {
            schema.insert(def.clone());
        }
        schema
    }

    /// Check that definitions are unique and that every `requires` entry
    /// names a boolean property.
    fn check(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for def in &self.properties {
            if def.name.trim().is_empty() {
                return Err(ConfigError::Invalid("property with an empty name".to_string()));
            }
            if !seen.insert(def.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "property '{}' is defined more than once",
                    def.name
                )));
            }
        }

        let schema = self.to_schema();
        for def in &self.properties {
            for flag in &def.requires {
                match schema.get(flag) {
                    Some(target) if target.prop_type == PropertyType::Bool => {}
                    Some(target) => {
                        return Err(ConfigError::Invalid(format!(
                            "property '{}' requires '{}', which is a {} property, not a bool",
                            def.name, flag, target.prop_type
                        )));
                    }
                    None => {
                        return Err(ConfigError::Invalid(format!(
                            "property '{}' requires unknown flag '{}'",
                            def.name, flag
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
