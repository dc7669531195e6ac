#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Token Grid in the terminal.

mod config;
mod input;
mod session;

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use token_grid_core::StorePolicy;

use crate::{config::Overrides, input::PlayerInput, session::Session};

const BANNER: &str = "Token Grid. You are here: @";

/// Collect tokens on a location grid and craft them up to the victory value.
#[derive(Debug, Parser)]
#[command(name = "token-grid", version, long_about = None)]
struct Args {
    /// TOML file with session settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// What happens to cells that leave the view (`persistent` or `memoryless`).
    #[arg(long)]
    policy: Option<StorePolicy>,

    /// Maximum distance, in cells, at which clicks are accepted.
    #[arg(long, value_name = "N")]
    radius: Option<u32>,

    /// Crafted value at or above which the game is won.
    #[arg(long, value_name = "N")]
    victory: Option<u32>,

    /// Extra cells materialized around the view on every side.
    #[arg(long, value_name = "N")]
    margin: Option<u32>,

    /// Diagnostic log level written to stderr.
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,

    /// Read commands from a file instead of stdin.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            store_policy: self.policy,
            interaction_radius: self.radius,
            victory_value: self.victory,
            window_margin: self.margin,
        }
    }
}

/// Entry point for the Token Grid command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("failed to install terminal logger")?;

    let config = config::load(args.config.as_deref(), args.overrides())?;
    let mut session = Session::new(config)?;

    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open script at {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{BANNER}")?;
    write!(out, "{}", session.frame())?;
    out.flush()?;

    for line in reader.lines() {
        let line = line.context("failed to read command")?;
        let command = match input::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                eprintln!("{error:#}");
                continue;
            }
        };
        if matches!(command, PlayerInput::Quit) {
            break;
        }

        session.handle(command);
        write!(out, "{}", session.frame())?;
        out.flush()?;
    }

    Ok(())
}
