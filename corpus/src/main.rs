mod case;
mod cli;
mod outcome;
mod run;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use harness::exit_codes;
use harness::io::config::{CONFIG_FILE, load_config};
use harness::logging;
use tracing::debug;

#[derive(Parser)]
#[command(name = "corpus", version, about = "Script corpus for the harness")]
struct Cli {
    /// Config file (defaults to `harness.toml` in the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List discovered scripts.
    List {
        /// Corpus root (defaults to the configured `scripts_dir`).
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Run scripts and check them against their case files.
    Run {
        #[arg(long)]
        root: Option<PathBuf>,
        /// Only run scripts whose relative path contains this substring.
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let cfg = load_config(&config_path).context("load config")?;
    debug!(config = %config_path.display(), "config loaded");

    match cli.command {
        Command::List { root } => {
            let root = root.unwrap_or_else(|| cfg.scripts_dir.clone());
            cli::list_scripts(&cfg, &root)
        }
        Command::Run { root, filter } => {
            let root = root.unwrap_or_else(|| cfg.scripts_dir.clone());
            cli::run_scripts(&cfg, &root, filter.as_deref())
        }
    }
}
