//! Configuration types for the engine and its driver.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens to the statistics counters when the grid is resized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizePolicy {
    /// The resized grid starts a fresh lifecycle with zeroed counters
    #[default]
    ResetCounters,
    /// Generation, living and deceased counts carry over unchanged
    PreserveCounters,
}

/// Grid configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// Counter handling on resize
    pub resize_policy: ResizePolicy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 17,
            cols: 17,
            resize_policy: ResizePolicy::ResetCounters,
        }
    }
}

/// Random initial population. All densities are fractions of the grid (0.0 to 1.0).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Fraction of cells placed as live animals
    pub animal_density: f32,
    /// Fraction of cells placed as live plants
    pub plant_density: f32,
    /// Fraction of cells placed as walls
    pub wall_density: f32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            animal_density: 0.0,
            plant_density: 0.0,
            wall_density: 0.0,
        }
    }
}

impl SeedConfig {
    pub fn is_empty(&self) -> bool {
        self.animal_density == 0.0 && self.plant_density == 0.0 && self.wall_density == 0.0
    }
}

/// Log output format for the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// A pattern to stamp before the first tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternPlacement {
    /// Catalogue name, e.g. "glider"
    pub name: String,
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub kind: crate::CellKind,
}

/// Tick scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Stop after this many generations (runs until shutdown if unset)
    pub max_generations: Option<u64>,
    /// Print the grid every N generations (0 disables)
    pub render_every: u64,
    /// Emit population metrics every N generations (0 disables)
    pub stats_every: u64,
    /// Stop when a previously seen state repeats
    pub stop_on_cycle: bool,
    /// Number of past generations remembered for cycle detection
    pub cycle_history: usize,
    /// Log output format
    pub log_format: LogFormat,
    /// Patterns stamped onto the initial grid
    pub patterns: Vec<PatternPlacement>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 200,
            max_generations: None,
            render_every: 1,
            stats_every: 100,
            stop_on_cycle: true,
            cycle_history: 10,
            log_format: LogFormat::Text,
            patterns: Vec::new(),
        }
    }
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub grid: GridConfig,
    pub seed: SeedConfig,
    pub driver: DriverConfig,
}

impl LifeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LifeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(Error::InvalidDimensions {
                rows: self.grid.rows,
                cols: self.grid.cols,
            });
        }

        let densities = [
            ("animal_density", self.seed.animal_density),
            ("plant_density", self.seed.plant_density),
            ("wall_density", self.seed.wall_density),
        ];
        for (name, value) in densities {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within 0.0..=1.0, got {value}"
                )));
            }
        }
        let total: f32 = densities.iter().map(|(_, v)| v).sum();
        if total > 1.0 {
            return Err(Error::InvalidConfig(format!(
                "densities sum to {total}, which exceeds 1.0"
            )));
        }

        if self.driver.tick_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        if self.driver.cycle_history == 0 {
            return Err(Error::InvalidConfig(
                "cycle_history must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = LifeConfig::default();
        assert_eq!(config.grid.rows, 17);
        assert_eq!(config.grid.cols, 17);
        assert_eq!(config.grid.resize_policy, ResizePolicy::ResetCounters);
        assert_eq!(config.driver.tick_interval_ms, 200);
        assert!(config.seed.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LifeConfig::from_json_str(
            r#"{
                "grid": { "rows": 30, "resize_policy": "preserve_counters" },
                "driver": {
                    "tick_interval_ms": 50,
                    "patterns": [{ "name": "glider", "row": 1, "col": 1 }]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.grid.rows, 30);
        assert_eq!(config.grid.cols, 17);
        assert_eq!(config.grid.resize_policy, ResizePolicy::PreserveCounters);
        assert_eq!(config.driver.tick_interval_ms, 50);
        assert_eq!(config.driver.stats_every, 100);
        assert_eq!(config.driver.patterns.len(), 1);
        assert_eq!(config.driver.patterns[0].kind, crate::CellKind::Animal);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = LifeConfig::default();
        config.grid.cols = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDimensions { rows: 17, cols: 0 })
        ));

        let mut config = LifeConfig::default();
        config.seed.plant_density = 1.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = LifeConfig::default();
        config.seed.animal_density = 0.6;
        config.seed.plant_density = 0.6;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = LifeConfig::default();
        config.driver.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = LifeConfig::from_json_str("{ grid: ");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = LifeConfig::from_path("/nonexistent/biolife.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
