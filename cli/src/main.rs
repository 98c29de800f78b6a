use std::io::{self, BufRead, Write};
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use sapper_core::Difficulty;

use crate::app::{App, Flow, SeedSource};
use crate::command::Command;
use crate::render::BoardView;

mod app;
mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset: easy, medium or hard
    #[arg(short, long, default_value_t = Difficulty::default())]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn init_logging(filter: log::LevelFilter) {
    use tracing_subscriber::filter::LevelFilter;

    let level = match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    // the tracing-log bridge forwards the engine's `log` records
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn draw(out: &mut impl Write, app: &App) -> io::Result<()> {
    let session = app.session();
    write!(out, "{}", BoardView(session))?;
    writeln!(out, "{}", render::status_line(session))?;
    if let Some(message) = render::end_message(session) {
        writeln!(out, "{message}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());
    log::debug!("difficulty: {}, seed: {:?}", args.difficulty, args.seed);

    let seeds = match args.seed {
        Some(seed) => SeedSource::Fixed(seed),
        None => SeedSource::Random,
    };
    let mut app = App::new(args.difficulty, seeds, Instant::now())?;

    let mut out = io::stdout().lock();
    writeln!(out, "{}", command::HELP)?;
    draw(&mut out, &app)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read from stdin")?;
        match line.parse::<Command>() {
            Ok(Command::Help) => writeln!(out, "{}", command::HELP)?,
            Ok(command) => match app.handle(command, Instant::now()) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => writeln!(out, "{err}")?,
            },
            Err(err) => writeln!(out, "{err}")?,
        }
        draw(&mut out, &app)?;
    }

    log::debug!("Bye");
    Ok(())
}
