use serde::{Deserialize, Serialize};

/// What lies under a cell: a mine, or how many of its neighbors are mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    Adjacent(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn adjacent(self) -> Option<u8> {
        match self {
            Self::Mine => None,
            Self::Adjacent(count) => Some(count),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Adjacent(0)
    }
}

/// One square of the board as the engine tracks it.
///
/// A revealed cell is never flagged: reveals skip flagged cells and flagging ignores revealed ones.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) value: CellValue,
    pub(crate) flagged: bool,
    pub(crate) revealed: bool,
}

impl Cell {
    pub const fn value(self) -> CellValue {
        self.value
    }

    pub const fn is_mine(self) -> bool {
        self.value.is_mine()
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }
}
