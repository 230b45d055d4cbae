//! Grid engine for the Biolife cellular automaton.
//!
//! This crate owns every cell's state: rule evaluation, the two-pass
//! generation step, neighbor counting, resizing and running statistics.

pub mod cell;
pub mod grid;
pub mod patterns;
pub mod simulation;

pub use cell::Cell;
pub use grid::{Grid, GridSnapshot};
pub use patterns::Pattern;
pub use simulation::{CycleDetector, RunSummary, Simulation, StepOutcome};
