//! Headless tick driver for the Biolife engine.
//!
//! Advances a [`Simulation`] on a fixed interval and renders the grid as text.

mod telemetry;

use anyhow::{Context, Result};
use biolife_core::LifeConfig;
use biolife_world::Simulation;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

/// Why the tick loop ended on its own
#[derive(Debug, PartialEq, Eq)]
enum LoopExit {
    GenerationLimit,
    Cycle { period: usize },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let (config, source) = load_config()?;

    // Initialize telemetry
    telemetry::init_telemetry(config.driver.log_format)?;

    info!(
        source = %source,
        rows = config.grid.rows,
        cols = config.grid.cols,
        tick_interval_ms = config.driver.tick_interval_ms,
        "Starting Biolife driver"
    );

    // Build the simulation and show the starting grid
    let simulation = Arc::new(Mutex::new(Simulation::new(config)?));
    let start_generation = {
        let simulation = simulation.lock();
        render(&simulation);
        simulation.stats().generation_count
    };

    // Start the ticker
    let mut ticker = tokio::spawn(run_tick_loop(simulation.clone()));

    // Wait for the ticker to finish or a shutdown signal
    let mut cycle_period = None;
    tokio::select! {
        result = &mut ticker => match result {
            Ok(LoopExit::GenerationLimit) => info!("Generation limit reached"),
            Ok(LoopExit::Cycle { period }) => {
                info!(period, "Stopped on a repeated grid state");
                cycle_period = Some(period);
            }
            Err(e) => error!("Tick loop failed: {}", e),
        },
        _ = shutdown_signal() => {
            ticker.abort();

            // Wait for the ticker to stop (with timeout)
            let timeout = tokio::time::sleep(Duration::from_secs(30));
            tokio::pin!(timeout);

            tokio::select! {
                _ = &mut ticker => {
                    info!("Tick loop stopped");
                }
                _ = &mut timeout => {
                    warn!("Shutdown timeout reached");
                }
            }
        }
    }

    {
        let simulation = simulation.lock();
        let generations_run = simulation.stats().generation_count - start_generation;
        simulation.finish(generations_run, cycle_period);
    }

    // Shutdown telemetry
    telemetry::shutdown_telemetry();

    Ok(())
}

/// Read configuration from `BIOLIFE_CONFIG` or the first argument, falling
/// back to defaults
fn load_config() -> Result<(LifeConfig, String)> {
    let path = std::env::var("BIOLIFE_CONFIG")
        .ok()
        .or_else(|| std::env::args().nth(1));

    match path {
        Some(path) => {
            let config = LifeConfig::from_path(&path)
                .with_context(|| format!("failed to load config from {}", path))?;
            Ok((config, path))
        }
        None => Ok((LifeConfig::default(), "defaults".to_string())),
    }
}

async fn run_tick_loop(simulation: Arc<Mutex<Simulation>>) -> LoopExit {
    let driver = simulation.lock().config().driver.clone();

    let mut interval = interval(Duration::from_millis(driver.tick_interval_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut generations_run: u64 = 0;

    loop {
        if driver
            .max_generations
            .is_some_and(|limit| generations_run >= limit)
        {
            return LoopExit::GenerationLimit;
        }

        interval.tick().await;

        let outcome = {
            let mut simulation = simulation.lock();
            let outcome = simulation.step();
            if driver.render_every > 0 && outcome.report.generation % driver.render_every == 0 {
                render(&simulation);
            }
            outcome
        };
        generations_run += 1;

        if let Some(period) = outcome.cycle_period {
            if driver.stop_on_cycle {
                return LoopExit::Cycle { period };
            }
        }
    }
}

fn render(simulation: &Simulation) {
    let grid = simulation.grid();
    let stats = grid
        .stats()
        .entries()
        .iter()
        .map(|entry| format!("{}: {}", entry.name, entry.value))
        .collect::<Vec<_>>()
        .join("  ");

    println!("{}\n{}", stats, grid);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use biolife_core::{CellKind, PatternPlacement};

    fn shared(mut config: LifeConfig) -> Arc<Mutex<Simulation>> {
        config.driver.tick_interval_ms = 1;
        config.driver.render_every = 0;
        Arc::new(Mutex::new(Simulation::new(config).unwrap()))
    }

    #[tokio::test]
    async fn test_zero_generation_limit_never_steps() {
        let mut config = LifeConfig::default();
        config.driver.max_generations = Some(0);
        let simulation = shared(config);

        let exit = run_tick_loop(simulation.clone()).await;
        assert_eq!(exit, LoopExit::GenerationLimit);
        assert_eq!(simulation.lock().stats().generation_count, 0);
    }

    #[tokio::test]
    async fn test_generation_limit() {
        let mut config = LifeConfig::default();
        config.driver.max_generations = Some(3);
        config.driver.stop_on_cycle = false;
        let simulation = shared(config);

        let exit = run_tick_loop(simulation.clone()).await;
        assert_eq!(exit, LoopExit::GenerationLimit);
        assert_eq!(simulation.lock().stats().generation_count, 3);
    }

    #[tokio::test]
    async fn test_stops_on_cycle() {
        let mut config = LifeConfig::default();
        config.driver.max_generations = Some(50);
        config.driver.patterns.push(PatternPlacement {
            name: "blinker".to_string(),
            row: 5,
            col: 5,
            kind: CellKind::Animal,
        });
        let simulation = shared(config);

        let exit = run_tick_loop(simulation.clone()).await;
        assert_eq!(exit, LoopExit::Cycle { period: 2 });

        let simulation = simulation.lock();
        let summary = simulation.finish(simulation.stats().generation_count, Some(2));
        assert_eq!(summary.generations_run, 2);
        assert_eq!(summary.cycle_period, Some(2));
    }
}
