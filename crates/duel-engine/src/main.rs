//! # Duel
//!
//! Headless battle runner. Loads a config (path from the first argument,
//! `duel.toml` otherwise), plays the configured battle at a fixed frame rate
//! and logs the transcript and the winner.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::Result;
use duel_engine::{BattleConfig, SceneStack, TickScheduler, CONFIG_FILE};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);

    // Config first so its filter applies; report a bad file once logging is up.
    let loaded = path.exists().then(|| BattleConfig::try_load_from(&path));
    let config = match &loaded {
        Some(Ok(config)) => config.clone(),
        _ => BattleConfig::default(),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(config.log_filter.parse()?))
        .init();

    info!("Duel starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Some(Ok(_)) => info!("Loaded config from {}", path.display()),
        Some(Err(e)) => warn!("Failed to load config file, using defaults: {e}"),
        None => info!("Config file not found, using defaults"),
    }

    run(&config)?;

    info!("Duel shutdown complete");
    Ok(())
}

/// Play the configured battle to completion.
fn run(config: &BattleConfig) -> Result<()> {
    let mut stack = SceneStack::new(TickScheduler::from_config(config));
    let listener = stack.push_battle(config.battle_setup()?)?;
    let dt = stack.scheduler().frame_dt();

    info!(
        %listener,
        player = %config.player,
        opponent = %config.opponent,
        boss = config.boss.as_deref().unwrap_or("none"),
        "battle started"
    );

    while !stack.is_empty() {
        if stack.scheduler().frames() >= u64::from(config.max_frames) {
            warn!(frames = config.max_frames, "frame limit reached, tearing down");
            stack.pop_battle();
            break;
        }
        stack.tick(dt);
    }

    for finished in stack.finished() {
        for event in &finished.transcript {
            info!(listener = %finished.listener, ?event, "transcript");
        }
        match finished.outcome {
            Some(outcome) => info!(
                winner = %outcome.winner,
                ticks = outcome.ticks,
                elapsed = outcome.elapsed,
                "winner decided"
            ),
            None => warn!(listener = %finished.listener, "battle ended without a winner"),
        }
    }

    Ok(())
}
