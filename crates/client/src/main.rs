//! Arsenal headless client binary.
//!
//! Composition root that assembles:
//! 1. Content (tuning and the persisted arsenal) via `game-content`
//! 2. Runtime (session, ticker, event bus) via `RuntimeBuilder`
//! 3. The offline item generator and the autopilot player
//!
//! # Examples
//!
//! ```bash
//! ARSENAL_SEED=7 ARSENAL_BOSS_TIME_SEC=10 cargo run -p arsenal-client
//! RUST_LOG=runtime=debug cargo run -p arsenal-client
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use arsenal_client::{Autopilot, ClientConfig, Decision, OfflineGenerator, dirs, logging};
use game_content::{ArsenalLoader, ConfigLoader, ContentFactory};
use game_core::{ChargeOutcome, GameError, GameEvent, SessionSnapshot};
use runtime::{Event, GenerationEvent, Runtime, RuntimeError, RuntimeHandle, Topic};
use tokio::sync::broadcast::error::RecvError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Load configuration from environment
    let config = ClientConfig::from_env();
    let session_id = config
        .session_id
        .clone()
        .unwrap_or_else(logging::default_session_id);

    // 2. Setup logging
    let (_log_guard, _log_file) = logging::setup_logging(&session_id)?;
    tracing::info!("Starting Arsenal client");

    // 3. Load content
    let content = ContentFactory::new(dirs::data_dir());
    let game_config = match &config.config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => content.load_config()?,
    };
    let save_file = config
        .save_file
        .clone()
        .unwrap_or_else(|| content.arsenal_path());
    let saved_items = ArsenalLoader::load(&save_file)?;
    tracing::info!(
        "Loaded {} saved items from {}",
        saved_items.len(),
        save_file.display()
    );

    // 4. Build Runtime
    let runtime_config = config.runtime_config(game_config, fallback_seed());
    tracing::info!("Seed: {}", runtime_config.seed);
    let runtime = Runtime::builder()
        .config(runtime_config)
        .generator(OfflineGenerator::new())
        .saved_items(saved_items)
        .build()
        .await?;

    // 5. Play
    let handle = runtime.handle();
    let outcome = play(&handle, &config).await;

    // 6. Persist and shut down, even when play failed
    let saved = save_arsenal(&handle, &save_file).await;
    runtime.shutdown().await?;
    let summary = outcome?;
    saved?;

    println!(
        "stage {} | score {} | hp {}/{} | {:?}",
        summary.stage, summary.score, summary.hp, summary.max_hp, summary.state
    );
    tracing::info!("Client shutdown complete");
    Ok(())
}

async fn play(handle: &RuntimeHandle, config: &ClientConfig) -> Result<SessionSnapshot> {
    let mut autopilot = Autopilot::default();
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    let mut generation = handle.subscribe(Topic::Generation);
    let mut poll = tokio::time::interval(POLL_INTERVAL);
    let deadline = tokio::time::sleep(config.time_limit());
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                tracing::info!("Time limit of {}s reached", config.max_seconds);
                break;
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            event = lifecycle.recv() => match event {
                Ok(event) => log_lifecycle(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Lifecycle subscriber lagged by {} events", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            event = generation.recv() => {
                if let Ok(Event::Generation(event)) = event {
                    log_generation(&event);
                }
            }
            _ = poll.tick() => {
                let snapshot = handle.snapshot().await?;
                let decisions = autopilot.decide(&snapshot);
                if decisions.contains(&Decision::Stop) {
                    break;
                }
                for decision in decisions {
                    execute(handle, decision).await?;
                }
            }
        }
    }

    Ok(handle.snapshot().await?)
}

async fn execute(handle: &RuntimeHandle, decision: Decision) -> Result<()> {
    let result = match decision {
        Decision::Attack => handle.attack().await,
        Decision::Select { category, index } => handle.select_slot(category, index).await,
        Decision::ConfirmStage => handle.confirm_stage().await,
        Decision::Generate(request) => {
            handle
                .request_generation(request)
                .await
                .map(|outcome| match outcome {
                    ChargeOutcome::InsufficientMp {
                        required,
                        available,
                    } => tracing::debug!("Not enough MP: {} < {}", available, required),
                    ChargeOutcome::Charging { .. } | ChargeOutcome::AlreadyCharging => {}
                })
        }
        Decision::Stop => Ok(()),
    };

    match result {
        // The run can end between the snapshot and the command.
        Err(RuntimeError::Session(error)) if error.severity().is_recoverable() => {
            tracing::debug!("Skipped decision: {}", error);
            Ok(())
        }
        Err(error) => {
            let severity = error.severity();
            if severity.is_internal() {
                tracing::error!(
                    code = error.error_code(),
                    severity = severity.as_str(),
                    "Runtime failure: {}",
                    error
                );
            }
            Err(error).context("runtime command failed")
        }
        Ok(()) => Ok(()),
    }
}

async fn save_arsenal(handle: &RuntimeHandle, path: &Path) -> Result<()> {
    let items = handle.arsenal_items().await?;
    ArsenalLoader::save(path, &items)
        .with_context(|| format!("Failed to save arsenal to {}", path.display()))?;
    tracing::info!("Saved {} items to {}", items.len(), path.display());
    Ok(())
}

fn log_lifecycle(event: &Event) {
    match event.game_event() {
        Some(GameEvent::RunStarted { stage }) => tracing::info!("Stage {} started", stage),
        Some(GameEvent::StageClear { score, stage }) => {
            tracing::info!("Stage {} cleared with {} points", stage, score)
        }
        Some(GameEvent::GameOver { score, cleared }) => {
            tracing::info!("Game over: score={} cleared={}", score, cleared)
        }
        _ => {}
    }
}

fn log_generation(event: &GenerationEvent) {
    match event {
        GenerationEvent::Completed { category, name } => {
            tracing::info!("New {}: {}", category, name)
        }
        GenerationEvent::Failed { category, error } => {
            tracing::warn!("{} generation failed: {}", category, error)
        }
        GenerationEvent::Requested { .. } | GenerationEvent::Discarded { .. } => {}
    }
}

fn fallback_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
