use std::str::FromStr;

use sapper_core::{Coord, Coord2};
use thiserror::Error;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Expand(Coord2),
    NewGame,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command, type `h` for help")]
    Empty,
    #[error("Unknown command `{0}`, type `h` for help")]
    Unknown(String),
    #[error("`{0}` needs a row and a column")]
    MissingCoords(String),
    #[error("`{0}` is not a valid coordinate")]
    InvalidCoord(String),
    #[error("Unexpected trailing input `{0}`")]
    Trailing(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "r" | "reveal" => Self::Reveal(parse_coords(verb, &mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(verb, &mut words)?),
            "e" | "expand" => Self::Expand(parse_coords(verb, &mut words)?),
            "n" | "new" => Self::NewGame,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };

        match words.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(verb: &str, words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2, CommandError> {
    let mut next = || -> Result<Coord, CommandError> {
        let word = words
            .next()
            .ok_or_else(|| CommandError::MissingCoords(verb.to_string()))?;
        word.parse()
            .map_err(|_| CommandError::InvalidCoord(word.to_string()))
    };
    let row = next()?;
    let col = next()?;
    Ok((row, col))
}

pub const HELP: &str = "\
commands:
  r <row> <col>   reveal a cell
  f <row> <col>   toggle a flag
  e <row> <col>   reveal the neighbors of a satisfied number
  n               start a new game
  h               show this help
  q               quit";
