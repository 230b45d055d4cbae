//! Cell state and rule evaluation.

use biolife_core::CellKind;
use serde::Serialize;
use std::fmt;

/// A single grid cell.
///
/// `pending_next` is scratch space between [`Cell::calculate_next_state`] and
/// [`Cell::apply_next_state`]; outside that window it may be stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    kind: CellKind,
    alive: bool,
    #[serde(skip)]
    pending_next: bool,
}

impl Cell {
    /// Create a cell of `kind`. Walls are always dead regardless of `alive`.
    pub fn new(kind: CellKind, alive: bool) -> Self {
        Self {
            kind,
            alive: alive && kind.is_organic(),
            pending_next: false,
        }
    }

    pub fn animal(alive: bool) -> Self {
        Self::new(CellKind::Animal, alive)
    }

    pub fn plant(alive: bool) -> Self {
        Self::new(CellKind::Plant, alive)
    }

    pub fn wall() -> Self {
        Self::new(CellKind::Wall, false)
    }

    /// A freshly placed cell: plants start alive, animals and walls dead
    pub fn placed(kind: CellKind) -> Self {
        Self::new(kind, kind.alive_on_placement())
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Set the state directly, bypassing the rule. Has no effect on walls.
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive && self.kind.is_organic();
    }

    pub fn toggle(&mut self) {
        self.set_alive(!self.alive);
    }

    /// Compute the next state from the living-neighbor count without
    /// touching the current state.
    pub fn calculate_next_state(&mut self, living_neighbors: u8) {
        self.pending_next = self.kind.next_state(self.alive, living_neighbors);
    }

    /// Commit the previously calculated state
    pub fn apply_next_state(&mut self) {
        self.alive = self.pending_next;
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn label(&self) -> char {
        self.kind.label()
    }

    /// Render glyph: uppercase label when alive, lowercase when dead, walls always `W`
    pub fn glyph(&self) -> char {
        if self.alive || !self.kind.is_organic() {
            self.label()
        } else {
            self.label().to_ascii_lowercase()
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::animal(false)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
