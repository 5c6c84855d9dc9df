//! Subcommand implementations. Output goes to the given writer, diagnostics
//! go through `log`.

use ether_tiles_core::{TileProperties, Tileset};
use ether_tiles_schema::SchemaConfig;
use ether_tiles_tiled::TilesetLoader;
use std::io::Write;

use crate::args::{Args, Command};
use crate::CliError;

pub fn run(args: &Args, out: &mut dyn Write) -> Result<(), CliError> {
    let config = load_config(args)?;
    run_with_config(args, &config, out)
}

/// Run a command with an already loaded configuration
pub fn run_with_config(
    args: &Args,
    config: &SchemaConfig,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let loader = TilesetLoader::from_config(config);

    match args.command {
        Command::Inspect => inspect(&loader, args, out),
        Command::Validate => validate(&loader, args, out),
        Command::ExportJson => export_json(&loader, args, out),
        Command::Level => level(&loader, args, out),
    }
}

fn load_config(args: &Args) -> Result<SchemaConfig, CliError> {
    let config = match &args.config {
        Some(path) => SchemaConfig::load(path)?,
        None => SchemaConfig::discover()?,
    };
    Ok(config)
}

fn inspect(loader: &TilesetLoader, args: &Args, out: &mut dyn Write) -> Result<(), CliError> {
    let tileset = loader.load(&args.path)?;
    write_header(&tileset, out)?;
    for (id, props) in tileset.declared_tiles() {
        let behavior = tileset.behavior(id)?;
        writeln!(out, "{:>5}  {:<12} {}", id, behavior.name(), describe(props))?;
    }
    Ok(())
}

fn write_header(tileset: &Tileset, out: &mut dyn Write) -> Result<(), CliError> {
    writeln!(out, "Tileset '{}'", tileset.name)?;
    if let Some(version) = &tileset.tiled_version {
        writeln!(out, "  saved by: Tiled {}", version)?;
    }
    writeln!(
        out,
        "  tiles: {} ({} columns x {} rows) of {}x{} px",
        tileset.tile_count,
        tileset.columns,
        tileset.rows(),
        tileset.tile_width,
        tileset.tile_height
    )?;
    writeln!(
        out,
        "  image: {} ({}x{})",
        tileset.image.source, tileset.image.width, tileset.image.height
    )?;
    if !tileset.properties.is_empty() {
        writeln!(out, "  properties: {}", describe(&tileset.properties))?;
    }
    writeln!(out, "  declared: {}", tileset.tiles.len())?;
    Ok(())
}

fn describe(props: &TileProperties) -> String {
    props
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn validate(loader: &TilesetLoader, args: &Args, out: &mut dyn Write) -> Result<(), CliError> {
    let (tileset, report) = loader.load_with_report(&args.path)?;
    for warning in &report.warnings {
        writeln!(out, "warning: {}", warning)?;
    }
    writeln!(
        out,
        "{}: {} tiles, {} declared, {} warnings",
        args.path.display(),
        tileset.tile_count,
        tileset.tiles.len(),
        report.warnings.len()
    )?;
    Ok(())
}

fn export_json(loader: &TilesetLoader, args: &Args, out: &mut dyn Write) -> Result<(), CliError> {
    let tileset = loader.load(&args.path)?;
    serde_json::to_writer_pretty(&mut *out, &tileset)?;
    writeln!(out)?;
    Ok(())
}

fn level(loader: &TilesetLoader, args: &Args, out: &mut dyn Write) -> Result<(), CliError> {
    let layout = loader.load_level(&args.path)?;
    let summary = layout.summary();

    writeln!(
        out,
        "Level {}x{} tiles ({}x{} px), {} tilesets, {} layers",
        layout.width,
        layout.height,
        summary.width,
        summary.height,
        layout.tilesets.len(),
        layout.layers.len()
    )?;
    let [x, y] = summary.player_spawn;
    writeln!(out, "  player spawn: ({}, {})", x, y)?;
    writeln!(out, "  enemies: {}", summary.enemies.len())?;
    for enemy in &summary.enemies {
        let [x, y] = enemy.position;
        let class = enemy.tile.class.as_deref().unwrap_or("<untyped>");
        writeln!(out, "    {} at ({}, {})", class, x, y)?;
    }
    writeln!(out, "  collectables: {}", summary.collectables.len())?;
    writeln!(out, "  falling: {}", summary.falling.len())?;
    writeln!(out, "  breakable: {}", summary.breakable.len())?;
    writeln!(out, "  healing: {}", summary.healing.len())?;
    writeln!(out, "  obstacles: {}", summary.obstacles.len())?;
    writeln!(out, "  platforms: {}", summary.platforms.len())?;
    writeln!(out, "  static tiles: {}", summary.static_tiles.len())?;
    Ok(())
}
