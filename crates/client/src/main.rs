//! Command-line battle runner.
//!
//! Loads a roster and config, fights the battle with [`AutoProvider`] on both
//! sides and prints the outcome together with the scheduler digest.
mod config;
mod logging;
mod recorder;

use anyhow::{Context, Result};
use battle_content::{ConfigLoader, ContentFactory, RosterLoader};
use battle_core::{BattleConfig, Roster};
use runtime::{AutoProvider, Battle};

use config::ClientConfig;
use recorder::EventRecorder;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();

    let log_root = config
        .log_dir
        .clone()
        .unwrap_or_else(logging::default_log_dir);
    let session_id = config
        .session_id
        .clone()
        .unwrap_or_else(logging::generated_session_id);
    let session_dir = logging::setup_logging(&log_root, &session_id)?;

    let (battle_config, roster) = load_content(&config)?;
    tracing::info!(
        combatants = roster.len(),
        max_rounds = battle_config.max_rounds,
        "content loaded"
    );

    let mut builder = Battle::builder()
        .config(battle_config)
        .roster(roster)
        .ally_provider(AutoProvider)
        .enemy_provider(AutoProvider);
    if let Some(capacity) = config.event_buffer {
        builder = builder.event_capacity(capacity);
    }
    let mut battle = builder.build()?;

    let recorder = EventRecorder::new(&battle.events(), &session_dir.join("events.jsonl"))?;
    let recording = tokio::spawn(recorder.run());

    let result = battle.run().await;
    // Dropping the battle closes the event channels and ends the recorder.
    drop(battle);
    let recorded = recording.await.context("event recorder task failed")??;
    let summary = result?;

    tracing::info!(events = recorded, "event log written");
    match summary.outcome {
        Some(outcome) => println!(
            "{outcome} after {} rounds ({} turns)",
            summary.rounds, summary.turns
        ),
        None => println!(
            "no winner after {} rounds ({} turns)",
            summary.rounds, summary.turns
        ),
    }
    println!("digest {}", summary.digest_hex());

    Ok(())
}

fn load_content(config: &ClientConfig) -> Result<(BattleConfig, Roster)> {
    let factory = config
        .data_dir
        .clone()
        .map_or_else(ContentFactory::bundled, ContentFactory::new);
    tracing::debug!("Content directory: {}", factory.data_dir().display());

    let battle_config = match &config.config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => factory.load_config()?,
    };
    let roster = match &config.roster_path {
        Some(path) => RosterLoader::load(path)?,
        None => factory.load_roster()?,
    };
    Ok((battle_config, roster))
}
