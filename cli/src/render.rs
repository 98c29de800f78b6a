use std::fmt;

use sapper_core::{Coord2, GameSession, GameStatus};

/// Text view of the board, one row per line with row and column labels.
pub struct BoardView<'a>(pub &'a GameSession);

impl BoardView<'_> {
    fn glyph(&self, coords: Coord2) -> char {
        let session = self.0;
        let cell = session.grid()[coords];

        if !cell.is_revealed() {
            return if cell.is_flagged() { 'F' } else { '#' };
        }
        match cell.value().adjacent() {
            None if session.triggered_mine() == Some(coords) => 'X',
            None => '*',
            Some(0) => '.',
            Some(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        }
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.0.size();

        write!(f, "    ")?;
        for col in 0..cols {
            write!(f, "{:>3}", col)?;
        }
        writeln!(f)?;

        for row in 0..rows {
            write!(f, "{:>4}", row)?;
            for col in 0..cols {
                write!(f, "{:>3}", self.glyph((row, col)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub fn status_line(session: &GameSession) -> String {
    format!(
        "flags left: {}   time: {}s",
        session.remaining_flags(),
        session.elapsed_seconds()
    )
}

/// Banner shown once the game is over, `None` while it is still being played.
pub fn end_message(session: &GameSession) -> Option<String> {
    match session.status() {
        GameStatus::InProgress => None,
        GameStatus::Won => Some(format!(
            "You have won! Your score is {} seconds.",
            session.elapsed_seconds()
        )),
        GameStatus::Lost if session.all_mines_shown() => Some("You have lost the game!".to_string()),
        GameStatus::Lost => Some(format!(
            "Boom! {} of {} mines were still unflagged.",
            session.mines_shown(),
            session.mine_count()
        )),
    }
}
