//! Game-state engine for a single-player mine-detection puzzle.
//!
//! A [`GameSession`] owns the board and every counter. A presentation layer calls
//! [`GameSession::reveal`], [`GameSession::toggle_flag`], [`GameSession::expand`] and [`GameSession::tick`], then
//! redraws the coordinates listed in the returned reports.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::BitOr;

pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use generator::*;
pub use types::*;

mod cell;
mod config;
mod engine;
mod error;
mod field;
mod generator;
mod types;

/// Whether a flag toggle changed the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

/// Result of a reveal or expand, variants ordered by how much they matter to the caller.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum RevealOutcome {
    #[default]
    NoChange,
    Revealed,
    Won,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Keeps the strongest of two outcomes when one action reveals several cells.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.max(rhs)
    }
}

/// What a reveal or expand changed, in the order it happened.
///
/// `cells` lists every coordinate whose reveal state flipped, including the mines shown after a loss, so a
/// presentation layer only needs to redraw those.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    pub cells: Vec<Coord2>,
}

impl RevealReport {
    pub fn has_update(&self) -> bool {
        self.outcome.has_update()
    }
}

/// What a flag toggle changed, with the remaining-flag counter after it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlagReport {
    pub outcome: MarkOutcome,
    pub remaining_flags: i32,
}
