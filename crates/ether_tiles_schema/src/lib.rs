//! Property schema for ether_tiles
//!
//! This crate knows which tile properties the game recognizes, what type each
//! one has once normalized, and which flag a numeric property depends on. It
//! is applied by the tileset loader after parsing.
//!
//! # Example
//!
//! ```rust,ignore
//! use ether_tiles_schema::{SchemaConfig, ValidationReport};
//!
//! let config = SchemaConfig::discover()?;
//! let schema = config.to_schema();
//!
//! let mut report = ValidationReport::default();
//! schema.apply(Some(62), &mut props, &config.loader, &mut report)?;
//! ```

mod config;
mod types;
mod validate;

pub use config::*;
pub use types::*;
pub use validate::*;

use thiserror::Error;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
