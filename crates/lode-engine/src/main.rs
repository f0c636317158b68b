//! Game-state processor binary for Lode.
//!
//! Replays a JSON list of chain updates through the block processor and
//! prints the confirmed game state as JSON on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lode-config.yaml` (or the path given as the
//!    second argument); fall back to defaults when the file is missing
//! 2. Initialize structured logging (tracing)
//! 3. Build the empty game state, prospector and chain context
//! 4. Replay every chain update in order
//! 5. Print the final snapshot

mod error;

use std::path::Path;

use lode_core::parse::WireUpdate;
use lode_core::{BlockRules, ChainContext, GameState, GspConfig, StepMovement};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "lode-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration or the updates file cannot be
/// loaded, or if any chain update fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let updates_path = args.next().ok_or(EngineError::Usage)?;
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_owned());

    // 1. Load configuration.
    let (config, from_file) = load_config(Path::new(&config_path))?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("lode-engine starting");
    if from_file {
        info!(path = %config_path, "Configuration loaded");
    } else {
        info!(path = %config_path, "Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        region_size = config.world.region_size,
        rate = config.mining.rate,
        undo_depth = config.chain.undo_depth,
        "Configuration"
    );

    // 3. Build state and chain context.
    let mut state = GameState::new(config.region_map()?);
    let prospector = config.prospector();
    let rules = BlockRules {
        rate: config.mining.rate,
        prospector: &prospector,
        movement: &StepMovement,
    };
    let mut chain = ChainContext::from_config(&config.chain);

    // 4. Replay chain updates.
    let updates = load_updates(Path::new(&updates_path))?;
    info!(updates = updates.len(), path = %updates_path, "Chain updates loaded");
    for update in updates {
        let update = update.into_update();
        chain.apply_update(&mut state, &update, &rules).map_err(EngineError::from)?;
    }

    let tip = chain.tip();
    if tip.height == config.chain.genesis_height {
        warn!("No blocks were processed");
    }
    info!(height = tip.height, hash = %tip.hash, characters = state.characters.len(), "Replay finished");

    // 5. Print the snapshot.
    let snapshot = state.snapshot(tip.height, &tip.hash, config.mining.rate);
    let json = serde_json::to_string_pretty(&snapshot).map_err(EngineError::from)?;
    println!("{json}");

    Ok(())
}

/// Load configuration from `path`, or defaults when it does not exist.
///
/// The flag tells whether the file was found.
fn load_config(path: &Path) -> Result<(GspConfig, bool), EngineError> {
    if path.exists() {
        Ok((GspConfig::from_file(path)?, true))
    } else {
        Ok((GspConfig::parse("")?, false))
    }
}

/// Read the JSON list of chain updates.
fn load_updates(path: &Path) -> Result<Vec<WireUpdate>, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}
