use alloc::vec::Vec;
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Purely random placement by rejection sampling: draw any cell, retry on repeats and on the start cell.
///
/// Mine density always leaves at least one free cell, so sampling terminates.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, size: Coord2, mine_count: CellCount, exclude: Coord2) -> Vec<Coord2> {
        let (rows, cols) = size;
        let total_cells = mult(rows, cols);

        if mine_count >= total_cells {
            log::warn!(
                "Cannot keep a safe cell, requested {} mines but only {} cells",
                mine_count,
                total_cells
            );
            return Vec::new();
        }

        let mut mine_mask: Array2<bool> = Array2::default(nd_index(size));
        let mut mines = Vec::with_capacity(mine_count.into());
        while mines.len() < usize::from(mine_count) {
            let coords = (self.rng.random_range(0..rows), self.rng.random_range(0..cols));
            if coords == exclude || mine_mask[nd_index(coords)] {
                continue;
            }
            mine_mask[nd_index(coords)] = true;
            mines.push(coords);
        }
        mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_layout() {
        let a = RandomMineGenerator::new(42).generate((16, 16), 40, (3, 5));
        let b = RandomMineGenerator::new(42).generate((16, 16), 40, (3, 5));

        assert_eq!(a, b);
    }

    #[test]
    fn mines_are_distinct_and_avoid_start() {
        let mines = RandomMineGenerator::new(5).generate((4, 4), 15, (2, 2));

        assert_eq!(mines.len(), 15);
        assert!(!mines.contains(&(2, 2)));
        for (i, a) in mines.iter().enumerate() {
            assert!(a.0 < 4 && a.1 < 4);
            assert!(!mines[i + 1..].contains(a));
        }
    }

    #[test]
    fn full_board_yields_nothing() {
        assert!(RandomMineGenerator::new(0).generate((2, 2), 4, (0, 0)).is_empty());
    }
}
