use anyhow::Context;
use clap::Parser;
use play_2048::config::{PlayConfig, PlayOverrides};
use play_2048::session::{Command, Outcome, Session, HELP};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "play-2048", about = "Play 2048 in the terminal, one command per line")]
struct Args {
    /// Optional TOML settings file (seed, initial_board, log, autostart)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for tile placement; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Text file with 4 rows of 4 cells ("." or 0 for empty) to start from
    #[arg(long)]
    board: Option<PathBuf>,

    /// Tracing filter, e.g. "info", "play_2048=debug". Logs go to stderr.
    #[arg(long)]
    log: Option<String>,

    /// Start immediately instead of waiting for `start`
    #[arg(long)]
    autostart: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let file_cfg = match &args.config {
        Some(path) => PlayConfig::from_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PlayConfig::default(),
    };
    let initial_board = match &args.board {
        Some(path) => Some(
            PlayConfig::board_from_path(path)
                .with_context(|| format!("failed to load board {}", path.display()))?,
        ),
        None => None,
    };
    let cfg = file_cfg.overlay(PlayOverrides {
        seed: args.seed,
        initial_board,
        log: args.log,
        autostart: args.autostart,
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cfg.log))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
    tracing::debug!(?cfg, "configuration resolved");

    let mut session = Session::new(cfg.build_game());
    if cfg.autostart {
        session.handle(Command::Start);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{session}")?;
    writeln!(out, "Type ? for help.")?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                out.flush()?;
                continue;
            }
        };
        match session.handle(command) {
            Outcome::Redraw => write!(out, "{session}")?,
            Outcome::Unchanged => {}
            Outcome::Help => writeln!(out, "{HELP}")?,
            Outcome::Quit => break,
        }
        out.flush()?;
    }

    let game = session.game();
    writeln!(out, "Final score: {} | highest tile: {} | status: {}", game.score(), game.state().highest_tile(), game.status())?;
    Ok(())
}
