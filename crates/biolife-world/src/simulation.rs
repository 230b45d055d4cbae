//! Driver-facing simulation wrapper around a [`Grid`].

use crate::grid::Grid;
use crate::patterns;
use biolife_core::{
    Census, CellKind, GenerationReport, LifeConfig, LifeStats, Position, Result,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::{debug, event, info, instrument, warn, Level};

/// Remembers recent grid state hashes and reports when one repeats
#[derive(Debug, Clone)]
pub struct CycleDetector {
    history: VecDeque<u64>,
    capacity: usize,
}

impl CycleDetector {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a state. Returns the period if it matches one of the last
    /// `capacity` states (1 for a still life or extinction).
    pub fn observe(&mut self, hash: u64) -> Option<usize> {
        let period = self
            .history
            .iter()
            .rev()
            .position(|&seen| seen == hash)
            .map(|i| i + 1);

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(hash);
        period
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

/// Result of a single [`Simulation::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub report: GenerationReport,
    /// Set when the new state repeats a recent one
    pub cycle_period: Option<usize>,
}

/// Summary of a [`Simulation::run`]
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generations_run: u64,
    pub stats: LifeStats,
    pub census: Census,
    pub cycle_period: Option<usize>,
}

pub struct Simulation {
    grid: Grid,
    config: LifeConfig,
    cycles: CycleDetector,
}

impl Simulation {
    pub fn new(config: LifeConfig) -> Result<Self> {
        config.validate()?;
        let mut grid = Grid::new(config.grid.rows, config.grid.cols)?;

        if !config.seed.is_empty() {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.seed);
            let placed = patterns::seed_random(&mut grid, &config.seed, &mut rng)?;
            debug!(seed = config.seed.seed, placed, "Seeded random population");
        }

        for placement in &config.driver.patterns {
            patterns::find(&placement.name)?.stamp(
                &mut grid,
                Position::new(placement.row, placement.col),
                placement.kind,
            )?;
            debug!(
                pattern = %placement.name,
                row = placement.row,
                col = placement.col,
                kind = %placement.kind,
                "Stamped pattern"
            );
        }

        let mut cycles = CycleDetector::new(config.driver.cycle_history);
        cycles.observe(grid.state_hash());

        info!(
            dimensions = %grid.dimensions(),
            living = grid.census().living(),
            "Simulation created"
        );

        Ok(Self {
            grid,
            config,
            cycles,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub fn stats(&self) -> LifeStats {
        self.grid.stats()
    }

    /// Advance one generation
    pub fn step(&mut self) -> StepOutcome {
        let report = self.grid.advance_generation();
        let cycle_period = self.cycles.observe(self.grid.state_hash());

        let stats_every = self.config.driver.stats_every;
        if stats_every > 0 && report.generation % stats_every == 0 {
            self.emit_population_metrics(&report);
        }

        if let Some(period) = cycle_period {
            warn!(
                event = "cycle_detected",
                generation = report.generation,
                period,
                living = report.living,
                "Grid state repeated"
            );
        }

        StepOutcome {
            report,
            cycle_period,
        }
    }

    /// Run up to `generations` steps, stopping early on a repeated state when
    /// `stop_on_cycle` is configured
    #[instrument(skip(self))]
    pub fn run(&mut self, generations: u64) -> RunSummary {
        let mut generations_run = 0;
        let mut cycle_period = None;

        for _ in 0..generations {
            let outcome = self.step();
            generations_run += 1;

            if outcome.cycle_period.is_some() {
                cycle_period = outcome.cycle_period;
                if self.config.driver.stop_on_cycle {
                    break;
                }
            }
        }

        self.finish(generations_run, cycle_period)
    }

    /// Close out a run driven step by step from outside, logging the
    /// `run_summary` event
    pub fn finish(&self, generations_run: u64, cycle_period: Option<usize>) -> RunSummary {
        let summary = self.summary(generations_run, cycle_period);
        self.emit_run_summary(&summary);
        summary
    }

    pub fn summary(&self, generations_run: u64, cycle_period: Option<usize>) -> RunSummary {
        RunSummary {
            generations_run,
            stats: self.grid.stats(),
            census: self.grid.census(),
            cycle_period,
        }
    }

    pub fn toggle_living(&mut self, pos: impl Into<Position>) -> Result<()> {
        self.grid.toggle_living(pos)?;
        self.cycles.reset();
        Ok(())
    }

    pub fn place_cell(&mut self, pos: impl Into<Position>, kind: CellKind, alive: bool) -> Result<()> {
        self.grid.place_cell(pos, kind, alive)?;
        self.cycles.reset();
        Ok(())
    }

    /// Place a fresh cell of `kind` in its conventional initial state
    pub fn place(&mut self, pos: impl Into<Position>, kind: CellKind) -> Result<()> {
        self.place_cell(pos, kind, kind.alive_on_placement())
    }

    pub fn apply_pattern(&mut self, name: &str, origin: Position, kind: CellKind) -> Result<()> {
        patterns::find(name)?.stamp(&mut self.grid, origin, kind)?;
        self.cycles.reset();
        debug!(pattern = name, origin = %origin, kind = %kind, "Applied pattern");
        Ok(())
    }

    /// Replace the grid with a resized copy, handling counters per the
    /// configured resize policy
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        let policy = self.config.grid.resize_policy;
        let resized = self.grid.resize_with(rows, cols, policy)?;
        info!(
            from = %self.grid.dimensions(),
            to = %resized.dimensions(),
            ?policy,
            "Grid resized"
        );
        self.grid = resized;
        self.cycles.reset();
        Ok(())
    }

    /// Wipe the board, keeping the current dimensions
    pub fn clear(&mut self) {
        self.grid = self.grid.cleared();
        self.cycles.reset();
        info!(dimensions = %self.grid.dimensions(), "Grid cleared");
    }

    /// Return to an empty grid at the configured dimensions
    pub fn reset(&mut self) -> Result<()> {
        self.grid = Grid::new(self.config.grid.rows, self.config.grid.cols)?;
        self.cycles.reset();
        info!(dimensions = %self.grid.dimensions(), "Grid reset");
        Ok(())
    }

    fn emit_population_metrics(&self, report: &GenerationReport) {
        let census = self.grid.census();
        let stats = self.grid.stats();

        info!(
            event = "population_metrics",
            generation = report.generation,
            living = stats.living_count,
            deceased_total = stats.deceased_count,
            born = report.born,
            died = report.died,
            living_animals = census.animals.living,
            living_plants = census.plants.living,
            walls = census.walls.total,
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "living_cells",
            gauge_value = stats.living_count,
            generation = report.generation,
            "Living cells gauge"
        );

        event!(
            Level::INFO,
            gauge_name = "deceased_cells",
            gauge_value = stats.deceased_count,
            generation = report.generation,
            "Deceased cells gauge"
        );
    }

    fn emit_run_summary(&self, summary: &RunSummary) {
        info!(
            event = "run_summary",
            generations_run = summary.generations_run,
            generation_count = summary.stats.generation_count,
            living = summary.stats.living_count,
            deceased = summary.stats.deceased_count,
            living_animals = summary.census.animals.living,
            living_plants = summary.census.plants.living,
            cycle_period = ?summary.cycle_period,
            "Run complete"
        );
    }
}
