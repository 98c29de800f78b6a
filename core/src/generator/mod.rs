use alloc::vec::Vec;
use core::fmt::Debug;

use crate::*;
pub use random::*;

mod random;

/// Picks mine positions once the first revealed cell is known.
pub trait MineGenerator: Debug {
    /// Returns exactly `mine_count` distinct in-bounds cells, none of them `exclude`.
    ///
    /// Callers guarantee `mine_count < size.0 * size.1`.
    fn generate(&mut self, size: Coord2, mine_count: CellCount, exclude: Coord2) -> Vec<Coord2>;
}
