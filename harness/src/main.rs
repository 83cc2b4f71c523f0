//! Command-line entry point for running programs under the harness.
//!
//! `run` executes against the simulated effects; `live` executes against the
//! real process environment.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use harness::core::error::EvalError;
use harness::core::state::VirtualFiles;
use harness::env::{BaseEnv, production_env, pure_env, test_env};
use harness::exit_codes;
use harness::io::config::{CONFIG_FILE, HarnessConfig, load_config, write_config};
use harness::io::system::SystemHost;
use harness::logging;
use harness::report::RunReport;
use harness::run::{Outcome, RunRequest, execute, run_request};

#[derive(Parser)]
#[command(
    name = "harness",
    version,
    about = "Run programs against deterministic simulated effects"
)]
struct Cli {
    /// Config file (defaults to `harness.toml` in the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file.
    Init {
        /// Replace an existing config file.
        #[arg(long)]
        force: bool,
        /// Seed to record instead of the default.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a script against a fresh simulated state.
    Run {
        script: PathBuf,
        /// File whose lines are served to `read-line!`.
        #[arg(long)]
        stdin: Option<PathBuf>,
        /// Expose a real file to `read-file!` as `VIRTUAL=REAL`.
        #[arg(long = "file", value_parser = parse_file_mapping)]
        files: Vec<(String, PathBuf)>,
        /// Override the configured seed.
        #[arg(long)]
        seed: Option<u64>,
        /// Use the pure environment (no effect primitives).
        #[arg(long)]
        pure: bool,
        /// Print a JSON report instead of plain output.
        #[arg(long)]
        json: bool,
    },
    /// Run a script with real stdin, stdout, files and entropy.
    Live {
        script: PathBuf,
        /// Directory `read-file!` paths are resolved against.
        #[arg(long, default_value = ".")]
        root: PathBuf,
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

    match cli.command {
        Command::Init { force, seed } => cmd_init(&config_path, force, seed),
        Command::Run {
            script,
            stdin,
            files,
            seed,
            pure,
            json,
        } => {
            let cfg = load_checked_config(&config_path)?;
            cmd_run(&cfg, &script, stdin.as_deref(), &files, seed, pure, json)
        }
        Command::Live { script, root } => {
            load_checked_config(&config_path)?;
            cmd_live(&script, &root)
        }
    }
}

fn load_checked_config(path: &Path) -> Result<HarnessConfig> {
    let cfg = load_config(path).context("load config")?;
    debug!(config = %path.display(), seed = cfg.seed, "config loaded");
    Ok(cfg)
}

fn cmd_init(path: &Path, force: bool, seed: Option<u64>) -> Result<i32> {
    if path.exists() && !force {
        bail!("{} already exists (pass --force to replace it)", path.display());
    }
    let cfg = HarnessConfig {
        seed: seed.unwrap_or(HarnessConfig::default().seed),
        ..HarnessConfig::default()
    };
    write_config(path, &cfg).context("write config")?;
    info!(config = %path.display(), seed = cfg.seed, "config written");
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

fn cmd_run(
    cfg: &HarnessConfig,
    script: &Path,
    stdin: Option<&Path>,
    files: &[(String, PathBuf)],
    seed: Option<u64>,
    pure: bool,
    json: bool,
) -> Result<i32> {
    let source = read_script(script)?;
    let stdin_lines = match stdin {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("read stdin file {}", path.display()))?
            .lines()
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    };
    let virtual_files = load_virtual_files(files)?;

    let env = if pure { pure_env() } else { test_env() };
    let request = RunRequest::new(source)
        .with_stdin(stdin_lines)
        .with_files(virtual_files)
        .with_seed(seed.unwrap_or(cfg.seed));
    info!(script = %script.display(), pure, "running script");
    let (outcome, stdout) = run_request(&env, request);

    if json {
        let report = RunReport::new(&outcome, stdout);
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        print_captured(&stdout, cfg.max_output_lines);
        print_outcome(&outcome);
        if pure
            && let Err(EvalError::Unbound(name)) = &outcome
            && test_env().has_primitive(name)
        {
            eprintln!("hint: {name} performs effects and is not bound under --pure");
        }
    }
    Ok(exit_code(&outcome))
}

fn cmd_live(script: &Path, root: &Path) -> Result<i32> {
    let source = read_script(script)?;
    let env: BaseEnv<SystemHost> = production_env();
    let mut host = SystemHost::new(root, env.bindings().clone());
    info!(script = %script.display(), root = %host.root().display(), "running script live");
    let outcome = execute(&env, &mut host, &source);
    print_outcome(&outcome);
    Ok(exit_code(&outcome))
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read script {}", path.display()))
}

fn load_virtual_files(mappings: &[(String, PathBuf)]) -> Result<VirtualFiles> {
    let mut files = VirtualFiles::new();
    for (virtual_path, real_path) in mappings {
        let content = fs::read_to_string(real_path)
            .with_context(|| format!("read {} for {}", real_path.display(), virtual_path))?;
        files.insert(virtual_path.clone(), content);
    }
    Ok(files)
}

fn parse_file_mapping(raw: &str) -> Result<(String, PathBuf), String> {
    let (virtual_path, real_path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected VIRTUAL=REAL, got {raw:?}"))?;
    if virtual_path.is_empty() || real_path.is_empty() {
        return Err(format!("expected VIRTUAL=REAL, got {raw:?}"));
    }
    Ok((virtual_path.to_string(), PathBuf::from(real_path)))
}

fn print_captured(stdout: &[String], limit: usize) {
    for line in stdout.iter().take(limit) {
        println!("{line}");
    }
    if stdout.len() > limit {
        eprintln!("[output truncated {} lines]", stdout.len() - limit);
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Ok(value) => println!("=> {value}"),
        Err(err) => eprintln!("error[{}]: {}", err.kind(), err),
    }
}

fn exit_code(outcome: &Outcome) -> i32 {
    match outcome {
        Ok(_) => exit_codes::OK,
        Err(_) => exit_codes::PROGRAM_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_with_options() {
        let cli = Cli::parse_from([
            "harness",
            "run",
            "echo.lisp",
            "--file",
            "a.txt=fixtures/a.txt",
            "--seed",
            "9",
            "--json",
        ]);
        match cli.command {
            Command::Run {
                script,
                files,
                seed,
                json,
                pure,
                ..
            } => {
                assert_eq!(script, PathBuf::from("echo.lisp"));
                assert_eq!(
                    files,
                    vec![("a.txt".to_string(), PathBuf::from("fixtures/a.txt"))]
                );
                assert_eq!(seed, Some(9));
                assert!(json);
                assert!(!pure);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn parse_live_defaults_root() {
        let cli = Cli::parse_from(["harness", "live", "main.lisp"]);
        assert!(matches!(cli.command, Command::Live { root, .. } if root == Path::new(".")));
    }

    #[test]
    fn parse_init_flags() {
        let cli = Cli::parse_from(["harness", "init", "--force", "--seed", "3"]);
        assert!(matches!(
            cli.command,
            Command::Init {
                force: true,
                seed: Some(3)
            }
        ));
    }

    #[test]
    fn file_mapping_requires_both_sides() {
        assert!(parse_file_mapping("a.txt").is_err());
        assert!(parse_file_mapping("=b").is_err());
        assert_eq!(
            parse_file_mapping("a.txt=b/c.txt"),
            Ok(("a.txt".to_string(), PathBuf::from("b/c.txt")))
        );
    }
}
