use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use minefield_core::{Difficulty, GameConfig, GameSession, LossCause, Phase};
use web_time::Instant;

use crate::command::Command;
use crate::score::HighScore;

mod command;
mod render;
mod score;

/// How often the clock is polled while waiting for input.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

type Lines = Receiver<io::Result<String>>;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board size and time limit preset
    #[arg(short, long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Override the preset's board width
    #[arg(long)]
    width: Option<u8>,

    /// Override the preset's board height
    #[arg(long)]
    height: Option<u8>,

    /// Chance for each cell to hold a mine
    #[arg(long)]
    mine_probability: Option<f64>,

    /// Override the preset's time limit, in seconds
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,

    /// Force a seed instead of random, later boards use the following seeds
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where the high score is kept
    #[arg(long, default_value = "score.json")]
    score_file: PathBuf,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        let mut config = self.difficulty.config();
        if let Some(width) = self.width {
            config.size.0 = width;
        }
        if let Some(height) = self.height {
            config.size.1 = height;
        }
        if let Some(mine_probability) = self.mine_probability {
            config.mine_probability = mine_probability;
        }
        if let Some(secs) = self.time_limit {
            config.time_limit = Duration::from_secs(secs);
        }
        config
    }
}

/// How a single board stopped being played.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SessionEnd {
    Finished,
    Restart,
    Quit,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let config = args.game_config();
    log::debug!("{} game, config: {config:?}", args.difficulty);
    let new_game = |round: u64| match args.seed {
        Some(seed) => GameSession::new(config, seed.wrapping_add(round)),
        None => GameSession::new_random(config),
    };

    let mut high_score = HighScore::load(&args.score_file)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "High score: {}", high_score.score)?;
    writeln!(stdout, "Commands: `r X Y` reveal, `f X Y` flag, `n` new game, `q` quit")?;

    let lines = spawn_reader();
    let mut last_tick = Instant::now();
    let mut clock = move || {
        let now = Instant::now();
        let elapsed = now - last_tick;
        last_tick = now;
        elapsed
    };

    run(
        new_game,
        &lines,
        &mut stdout,
        &mut clock,
        &mut high_score,
        &args.score_file,
    )
}

/// Reads stdin on its own thread so the clock keeps running while the player thinks.
fn spawn_reader() -> Lines {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Plays boards one after another until the player quits or input ends, recording the
/// high score after every finished board.
fn run(
    mut new_game: impl FnMut(u64) -> minefield_core::Result<GameSession>,
    lines: &Lines,
    out: &mut impl Write,
    clock: &mut impl FnMut() -> Duration,
    high_score: &mut HighScore,
    score_file: &Path,
) -> Result<()> {
    for round in 0.. {
        let mut game = new_game(round).context("could not start a game")?;
        let end = play(&mut game, lines, out, clock)?;

        if game.is_finished() && high_score.record(game.score()) {
            high_score.save(score_file)?;
            writeln!(out, "New high score: {}", high_score.score)?;
        }

        match end {
            SessionEnd::Restart => writeln!(out, "Starting a new game.")?,
            SessionEnd::Quit => break,
            SessionEnd::Finished => {
                write!(out, "Play again? [y/n] ")?;
                out.flush()?;
                let Ok(answer) = lines.recv() else {
                    break;
                };
                let answer = answer.context("could not read answer")?;
                if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Runs one session until it ends, the player asks for another board, or input closes.
/// `clock` reports the time passed since it was last called and is polled on every
/// command and every [`TICK_INTERVAL`] of silence.
fn play(
    game: &mut GameSession,
    lines: &Lines,
    out: &mut impl Write,
    clock: &mut impl FnMut() -> Duration,
) -> Result<SessionEnd> {
    write!(out, "{}", render::board(game))?;
    out.flush()?;

    let end = loop {
        let line = match lines.recv_timeout(TICK_INTERVAL) {
            Ok(line) => Some(line.context("could not read command")?),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => break SessionEnd::Quit,
        };

        if game.tick(clock()).phase.is_finished() {
            break SessionEnd::Finished;
        }
        let Some(line) = line else {
            continue;
        };

        let result = match command::parse(&line) {
            Ok(Command::Quit) => break SessionEnd::Quit,
            Ok(Command::Restart) => break SessionEnd::Restart,
            Ok(Command::Reveal(coords)) => game.reveal(coords).map(|result| result.changes.len()),
            Ok(Command::Flag(coords)) => game
                .toggle_flag(coords)
                .map(|result| usize::from(result.has_update())),
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match result {
            Ok(changed) => log::debug!("{changed} cells changed"),
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        }

        write!(out, "{}", render::board(game))?;
        out.flush()?;
        if game.is_finished() {
            break SessionEnd::Finished;
        }
    };

    report(game, out)?;
    Ok(end)
}

fn report(game: &GameSession, out: &mut impl Write) -> Result<()> {
    let message = match (game.phase(), game.loss_cause()) {
        (Phase::Won, _) => "You won!",
        (Phase::Lost, Some(LossCause::Timeout)) => "Out of time, you lost!",
        (Phase::Lost, _) => "Boom, you lost!",
        _ => "Game abandoned.",
    };
    writeln!(out, "{message}")?;

    if game.is_finished() {
        write!(out, "{}", render::board(game))?;
        writeln!(
            out,
            "Mines: {}  Correct flags: {}  Score: {}",
            game.mine_count(),
            game.correct_flag_count(),
            game.score()
        )?;
    }
    Ok(())
}
