mod catalog;
mod classify;
mod config;
mod error;
mod git;
mod message;
mod state;
mod theme;
mod tui;

use clap::Parser;
use config::Config;
use error::Result;
use git::GitCommitter;
use state::SessionEnd;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const COMMIT: Option<&str> = option_env!("GIT_CC_COMMIT");
const BUILD_DATE: Option<&str> = option_env!("GIT_CC_BUILD_DATE");
const BUILT_BY: Option<&str> = option_env!("GIT_CC_BUILT_BY");

/// Write conventional commits from a guided prompt
#[derive(Parser, Debug)]
#[command(name = "git-cc", about, disable_version_flag = true)]
struct Cli {
    /// Show version information
    #[arg(short = 'V', long)]
    version: bool,

    /// Read settings from this file instead of the default locations
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn print_version() {
    println!("git-cc {}", env!("CARGO_PKG_VERSION"));
    println!("  Commit: {}", COMMIT.unwrap_or("unknown"));
    println!("  Built: {}", BUILD_DATE.unwrap_or("unknown"));
    if let Some(who) = BUILT_BY {
        println!("  Built by: {}", who);
    }
}

fn run(cli: Cli) -> Result<SessionEnd> {
    let config = match cli.config {
        Some(path) => Config::load_from(&path)?,
        None => Config::load(),
    };
    log::debug!("{:?}", config);

    git::check_preconditions(Path::new("."))?;

    tui::run_tui(&config, &GitCommitter::default())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("GIT_CC_LOG", "warn")).init();

    let cli = Cli::parse();
    if cli.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    match run(cli) {
        Ok(SessionEnd::Committed(message)) => {
            println!("Committed: {}", message);
            ExitCode::SUCCESS
        }
        Ok(SessionEnd::Aborted) => {
            println!("Commit aborted.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
