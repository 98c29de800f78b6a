use std::time::{Duration, Instant};

use sapper_core::{Difficulty, GameSession};

use crate::command::Command;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Where each new game gets its seed from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SeedSource {
    /// Forced from the command line, bumped by one for every following game so replays stay reproducible.
    Fixed(u64),
    Random,
}

impl SeedSource {
    fn next_seed(&mut self) -> u64 {
        match self {
            Self::Fixed(seed) => {
                let current = *seed;
                *seed = seed.wrapping_add(1);
                current
            }
            Self::Random => rand::random(),
        }
    }
}

/// Turns wall time between inputs into whole-second ticks, carrying the remainder over.
#[derive(Clone, Debug)]
pub struct Clock {
    last: Instant,
    carry: Duration,
}

impl Clock {
    pub fn new(now: Instant) -> Self {
        Self {
            last: now,
            carry: Duration::ZERO,
        }
    }

    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let elapsed = self.carry + now.saturating_duration_since(self.last);
        self.last = now;
        let secs = elapsed.as_secs();
        self.carry = elapsed - Duration::from_secs(secs);
        u32::try_from(secs).unwrap_or(u32::MAX)
    }
}

/// The presentation side of a game: owns the live session and feeds it input and time.
#[derive(Debug)]
pub struct App {
    difficulty: Difficulty,
    seeds: SeedSource,
    session: GameSession,
    clock: Clock,
}

impl App {
    pub fn new(difficulty: Difficulty, mut seeds: SeedSource, now: Instant) -> anyhow::Result<Self> {
        let session = start_session(difficulty, &mut seeds)?;
        Ok(Self {
            difficulty,
            seeds,
            session,
            clock: Clock::new(now),
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Applies the seconds that passed since the last input, then the command itself.
    pub fn handle(&mut self, command: Command, now: Instant) -> anyhow::Result<Flow> {
        self.catch_up(now);

        match command {
            Command::Reveal(coords) => {
                let report = self.session.reveal(coords)?;
                if report.has_update() {
                    log::debug!("Reveal at {:?}: {:?}, {} cells", coords, report.outcome, report.cells.len());
                }
            }
            Command::Flag(coords) => {
                let report = self.session.toggle_flag(coords)?;
                log::debug!("Flag at {:?}: {:?}", coords, report.outcome);
            }
            Command::Expand(coords) => {
                let report = self.session.expand(coords)?;
                if report.has_update() {
                    log::debug!("Expand at {:?}: {:?}, {} cells", coords, report.outcome, report.cells.len());
                }
            }
            Command::NewGame => {
                self.session = start_session(self.difficulty, &mut self.seeds)?;
                self.clock = Clock::new(now);
            }
            Command::Help => {}
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn catch_up(&mut self, now: Instant) {
        for _ in 0..self.clock.due_ticks(now) {
            if self.session.is_finished() {
                break;
            }
            self.session.tick();
        }
    }
}

fn start_session(difficulty: Difficulty, seeds: &mut SeedSource) -> anyhow::Result<GameSession> {
    let seed = seeds.next_seed();
    log::debug!("Starting {} game with seed {}", difficulty, seed);
    Ok(GameSession::start(difficulty.into(), seed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::GameStatus;

    #[test]
    fn clock_carries_partial_seconds() {
        let start = Instant::now();
        let mut clock = Clock::new(start);

        assert_eq!(clock.due_ticks(start + Duration::from_millis(2500)), 2);
        assert_eq!(clock.due_ticks(start + Duration::from_millis(3100)), 1);
        assert_eq!(clock.due_ticks(start + Duration::from_millis(3200)), 0);
    }

    #[test]
    fn fixed_seeds_advance_per_game() {
        let mut seeds = SeedSource::Fixed(7);

        assert_eq!(seeds.next_seed(), 7);
        assert_eq!(seeds.next_seed(), 8);
        assert_eq!(seeds, SeedSource::Fixed(9));
    }

    #[test]
    fn commands_drive_the_session_and_clock() {
        let start = Instant::now();
        let mut app = App::new(Difficulty::Easy, SeedSource::Fixed(1), start).unwrap();

        let flow = app
            .handle(Command::Reveal((4, 4)), start + Duration::from_secs(3))
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(app.session().cell((4, 4)).unwrap().is_revealed());
        assert_eq!(app.session().elapsed_seconds(), 3);

        app.handle(Command::Flag((0, 0)), start + Duration::from_secs(3))
            .unwrap();
        let flagged = app.session().cell((0, 0)).unwrap();
        assert!(flagged.is_revealed() || flagged.is_flagged());
    }

    #[test]
    fn new_game_replaces_the_session() {
        let start = Instant::now();
        let mut app = App::new(Difficulty::Medium, SeedSource::Fixed(1), start).unwrap();
        app.handle(Command::Reveal((0, 0)), start).unwrap();

        app.handle(Command::NewGame, start + Duration::from_secs(5))
            .unwrap();

        assert!(!app.session().mines_placed());
        assert_eq!(app.session().status(), GameStatus::InProgress);
        assert_eq!(app.session().elapsed_seconds(), 0);
        assert_eq!(app.session().config(), Difficulty::Medium.config());
    }

    #[test]
    fn out_of_bounds_input_is_an_error_not_a_quit() {
        let start = Instant::now();
        let mut app = App::new(Difficulty::Easy, SeedSource::Fixed(1), start).unwrap();

        assert!(app.handle(Command::Reveal((9, 0)), start).is_err());
        assert_eq!(app.handle(Command::Quit, start).unwrap(), Flow::Quit);
    }
}
