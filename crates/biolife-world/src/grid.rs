//! 2D grid of cells and the generation engine.

use crate::cell::Cell;
use biolife_core::{
    Census, CellKind, Dimensions, Direction, GenerationReport, LifeStats, Position, ResizePolicy,
    Result,
};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::trace;

/// A bounded rectangular grid. Neighborhoods are clipped at the edges.
#[derive(Debug, Clone)]
pub struct Grid {
    dims: Dimensions,
    cells: Vec<Cell>,
    stats: LifeStats,
}

impl Grid {
    /// Create a grid of dead animal cells with zeroed counters
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let dims = Dimensions::new(rows, cols)?;
        Ok(Self::with_dimensions(dims))
    }

    pub fn with_dimensions(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: vec![Cell::default(); dims.area()],
            stats: LifeStats::new(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn rows(&self) -> usize {
        self.dims.rows()
    }

    pub fn cols(&self) -> usize {
        self.dims.cols()
    }

    pub fn stats(&self) -> LifeStats {
        self.stats
    }

    pub fn generation_count(&self) -> u64 {
        self.stats.generation_count
    }

    pub fn living_count(&self) -> u64 {
        self.stats.living_count
    }

    pub fn deceased_count(&self) -> u64 {
        self.stats.deceased_count
    }

    /// Get the cell at a position
    pub fn cell_at(&self, pos: impl Into<Position>) -> Result<&Cell> {
        let index = self.dims.index_of(pos.into())?;
        Ok(&self.cells[index])
    }

    pub fn is_alive(&self, pos: impl Into<Position>) -> Result<bool> {
        self.cell_at(pos).map(Cell::is_alive)
    }

    /// Set a cell's state directly. Counters are untouched until the next generation.
    pub fn set_alive(&mut self, pos: impl Into<Position>, alive: bool) -> Result<()> {
        let index = self.dims.index_of(pos.into())?;
        self.cells[index].set_alive(alive);
        Ok(())
    }

    /// Flip a cell's state directly. Counters are untouched until the next generation.
    pub fn toggle_living(&mut self, pos: impl Into<Position>) -> Result<()> {
        let index = self.dims.index_of(pos.into())?;
        self.cells[index].toggle();
        Ok(())
    }

    /// Replace the cell at a position with a fresh one of `kind`
    pub fn place_cell(&mut self, pos: impl Into<Position>, kind: CellKind, alive: bool) -> Result<()> {
        self.replace_cell(pos, Cell::new(kind, alive))
    }

    pub fn replace_cell(&mut self, pos: impl Into<Position>, cell: Cell) -> Result<()> {
        let index = self.dims.index_of(pos.into())?;
        self.cells[index] = cell;
        Ok(())
    }

    /// Living cells in the Moore neighborhood of `pos`, clipped at the edges
    pub fn count_living_neighbors(&self, pos: impl Into<Position>) -> Result<u8> {
        let pos = pos.into();
        self.dims.index_of(pos)?;
        Ok(self.living_neighbors(pos))
    }

    fn living_neighbors(&self, pos: Position) -> u8 {
        Direction::all()
            .iter()
            .filter_map(|direction| pos.step(*direction, self.dims))
            .filter(|neighbor| self.cells[neighbor.row * self.dims.cols() + neighbor.col].is_alive())
            .count() as u8
    }

    /// Advance every cell by one generation.
    ///
    /// All neighbor counts are taken from the committed state before any
    /// cell is updated, so evaluation order does not matter.
    pub fn advance_generation(&mut self) -> GenerationReport {
        let neighbor_counts: Vec<u8> = self
            .dims
            .positions()
            .map(|pos| self.living_neighbors(pos))
            .collect();

        for (cell, count) in self.cells.iter_mut().zip(neighbor_counts) {
            cell.calculate_next_state(count);
        }

        let mut living = 0;
        let mut died = 0;
        let mut born = 0;
        for cell in &mut self.cells {
            let was_alive = cell.is_alive();
            cell.apply_next_state();
            match (was_alive, cell.is_alive()) {
                (true, true) => living += 1,
                (false, true) => {
                    living += 1;
                    born += 1;
                }
                (true, false) => died += 1,
                (false, false) => {}
            }
        }

        self.stats.record_generation(living, died);

        let report = GenerationReport {
            generation: self.stats.generation_count,
            living,
            died,
            born,
        };
        trace!(
            generation = report.generation,
            living = report.living,
            died = report.died,
            born = report.born,
            "Generation committed"
        );
        report
    }

    /// A new grid of the target size holding this grid's cells where the two
    /// overlap. Counters start from zero.
    pub fn resize(&self, rows: usize, cols: usize) -> Result<Grid> {
        self.resize_with(rows, cols, ResizePolicy::ResetCounters)
    }

    pub fn resize_with(&self, rows: usize, cols: usize, policy: ResizePolicy) -> Result<Grid> {
        let mut resized = Grid::new(rows, cols)?;
        let overlap = self.dims.overlap(&resized.dims);

        for row in 0..overlap.rows() {
            let src = row * self.cols();
            let dst = row * resized.cols();
            resized.cells[dst..dst + overlap.cols()]
                .copy_from_slice(&self.cells[src..src + overlap.cols()]);
        }

        if policy == ResizePolicy::PreserveCounters {
            resized.stats = self.stats;
        }

        Ok(resized)
    }

    /// A fresh grid with the same dimensions
    pub fn cleared(&self) -> Grid {
        Grid::with_dimensions(self.dims)
    }

    /// Count cells per kind
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for cell in &self.cells {
            census.record(cell.kind(), cell.is_alive());
        }
        census
    }

    /// Hash of the committed (kind, alive) state, independent of counters
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.dims.hash(&mut hasher);
        for cell in &self.cells {
            cell.kind().hash(&mut hasher);
            cell.is_alive().hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Iterator over all cells with positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.dims.positions().zip(self.cells.iter())
    }

    /// Read-only copy of the visible state for renderers
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            rows: self.rows(),
            cols: self.cols(),
            cells: self
                .cells
                .chunks(self.cols())
                .map(|row| row.to_vec())
                .collect(),
            stats: self.stats,
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols()) {
            let line: String = row.iter().map(Cell::glyph).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Serializable view of a grid
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<Cell>>,
    pub stats: LifeStats,
}
