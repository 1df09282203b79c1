//! Published generation snapshots and driver commands.

use serde::Serialize;

use crate::compute::{Bounds, Cell, CellSet, bounding_box};

/// Immutable copy of the live cells at one generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Generation index, strictly increasing across publishes.
    pub generation: u64,
    /// Board extent the generation was computed with.
    pub bounds: Bounds,
    /// Live cells.
    pub cells: CellSet,
}

impl Snapshot {
    pub fn population(&self) -> usize {
        self.cells.len()
    }

    /// Bounding box of the live cells, `None` for an empty board.
    pub fn extent(&self) -> Option<(Cell, Cell)> {
        bounding_box(&self.cells)
    }
}

/// Mutations accepted by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Clear the board and seed with a density (`p < 1`) or count.
    Reseed(f64),
    /// Restore the newest pending snapshot, then seed extra random cells.
    AddRandom(f64),
    /// Kill every cell.
    Clear,
    /// Change the board extent used by subsequent steps.
    Resize(Bounds),
    /// Place cells on the board, replacing the live set unless `additive`.
    Inject { cells: CellSet, additive: bool },
    /// Advance one generation on the caller's thread.
    Step,
}
