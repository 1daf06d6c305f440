//! Tile Blast (workspace facade crate).
//!
//! Re-exports the workspace crates as `tile_blast::{core,input,term,types}` and holds the
//! setup shared by both binaries: logger initialisation and layered config loading.

use std::fs::File;
use std::path::Path;
use std::sync::Once;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;

pub use tile_blast_core as core;
pub use tile_blast_input as input;
pub use tile_blast_term as term;
pub use tile_blast_types as types;

use crate::core::GameConfig;

/// Where log records go
#[derive(Debug)]
pub enum LogSink<'a> {
    /// Discard everything (the terminal UI owns stdout/stderr)
    Off,
    Stderr,
    /// Append to a file
    File(&'a Path),
}

/// Initialise `env_logger` once. `RUST_LOG` refines the filter; `default` applies otherwise.
pub fn init_logger(sink: LogSink<'_>, default: LevelFilter) -> Result<()> {
    static INIT: Once = Once::new();

    let target = match sink {
        LogSink::Off => None,
        LogSink::Stderr => Some(Target::Stderr),
        LogSink::File(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            Some(Target::Pipe(Box::new(file)))
        }
    };

    INIT.call_once(|| {
        let mut builder = Builder::new();
        match target {
            None => {
                builder.filter_level(LevelFilter::Off);
            }
            Some(target) => {
                builder
                    .filter_level(default)
                    .parse_env("RUST_LOG")
                    .target(target)
                    .format_timestamp_millis();
            }
        }
        builder.try_init().ok();
    });
    Ok(())
}

/// Defaults, then the JSON document at `path` (if any), then `TILE_BLAST_*` overrides.
///
/// The result is validated, so a bad catalog or threshold fails here rather than mid-game.
pub fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            GameConfig::from_json_str(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    config.apply_env().context("apply TILE_BLAST_* overrides")?;
    config.validate().context("invalid configuration")?;
    log::debug!("config: {:?}", config);
    Ok(config)
}
