//! Running statistics for a grid's lifecycle.

use crate::CellKind;
use serde::{Deserialize, Serialize};

/// Counters maintained by the grid across generations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeStats {
    /// Completed generations since the grid was created
    pub generation_count: u64,
    /// Alive cells as of the last committed generation
    pub living_count: u64,
    /// Cumulative alive-to-dead transitions across all generations
    pub deceased_count: u64,
}

impl LifeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one committed generation.
    ///
    /// `living` is a full recount; `deceased` is the number of cells that
    /// died in this generation only.
    pub fn record_generation(&mut self, living: u64, deceased: u64) {
        self.generation_count += 1;
        self.living_count = living;
        self.deceased_count += deceased;
    }

    /// Labelled rows for a statistics table
    pub fn entries(&self) -> [StatEntry; 3] {
        [
            StatEntry::new("Generations", self.generation_count),
            StatEntry::new("Living Cells", self.living_count),
            StatEntry::new("Deceased Cells", self.deceased_count),
        ]
    }
}

/// One labelled statistic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatEntry {
    pub name: &'static str,
    pub value: u64,
}

impl StatEntry {
    pub fn new(name: &'static str, value: u64) -> Self {
        Self { name, value }
    }
}

/// Outcome of a single generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation number just completed (1 for the first tick)
    pub generation: u64,
    /// Alive cells after the commit
    pub living: u64,
    /// Cells that went from alive to dead in this generation
    pub died: u64,
    /// Cells that went from dead to alive in this generation
    pub born: u64,
}

/// Per-kind population counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub total: u64,
    pub living: u64,
}

/// Population broken down by cell kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub animals: KindCount,
    pub plants: KindCount,
    pub walls: KindCount,
}

impl Census {
    pub fn record(&mut self, kind: CellKind, alive: bool) {
        let slot = self.get_mut(kind);
        slot.total += 1;
        if alive {
            slot.living += 1;
        }
    }

    pub fn get(&self, kind: CellKind) -> KindCount {
        match kind {
            CellKind::Animal => self.animals,
            CellKind::Plant => self.plants,
            CellKind::Wall => self.walls,
        }
    }

    fn get_mut(&mut self, kind: CellKind) -> &mut KindCount {
        match kind {
            CellKind::Animal => &mut self.animals,
            CellKind::Plant => &mut self.plants,
            CellKind::Wall => &mut self.walls,
        }
    }

    pub fn living(&self) -> u64 {
        self.animals.living + self.plants.living + self.walls.living
    }
}
