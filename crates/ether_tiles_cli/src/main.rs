//! `ether-tiles` - inspect, validate and export Tiled tilesets and levels

mod args;
mod commands;
mod logging;

use ether_tiles_core::TilesetError;
use ether_tiles_schema::ConfigError;
use thiserror::Error;

/// Errors surfaced to the user
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Tileset(#[from] TilesetError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn main() {
    let args = match args::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, args::USAGE);
            std::process::exit(2);
        }
    };

    let _logger = match logging::init(args.verbose) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("error: could not start logger: {}", e);
            std::process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = commands::run(&args, &mut out) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
