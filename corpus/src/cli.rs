//! CLI command implementations.

use std::path::Path;

use anyhow::Result;
use harness::env::test_env;
use harness::exit_codes;
use harness::io::config::HarnessConfig;
use harness::io::discover::discover_scripts;
use tracing::info;

use crate::outcome::Verdict;
use crate::run::run_script;

/// Print every script under `root`, one relative path per line.
pub fn list_scripts(cfg: &HarnessConfig, root: &Path) -> Result<i32> {
    let (_, scripts) = discover_scripts(root, &cfg.script_extension)?;
    for script in scripts {
        println!("{}", script.display());
    }
    Ok(exit_codes::OK)
}

/// Run every script under `root` whose path contains `filter`.
///
/// Returns [`exit_codes::OK`] only when every selected script passes.
pub fn run_scripts(cfg: &HarnessConfig, root: &Path, filter: Option<&str>) -> Result<i32> {
    let (root, scripts) = discover_scripts(root, &cfg.script_extension)?;
    let selected: Vec<_> = scripts
        .into_iter()
        .filter(|script| matches_filter(script, filter))
        .collect();
    info!(root = %root.display(), scripts = selected.len(), "corpus run started");

    let env = test_env();
    let mut failed = 0usize;
    for script in &selected {
        let run = run_script(&env, &root, script, cfg.seed)?;
        match &run.verdict {
            Verdict::Pass => println!("pass: {}", run.script.display()),
            Verdict::Fail(reasons) => {
                failed += 1;
                println!("FAIL: {}", run.script.display());
                for reason in reasons {
                    println!("  {reason}");
                }
            }
        }
    }

    println!(
        "summary: scripts={} passed={} failed={}",
        selected.len(),
        selected.len() - failed,
        failed
    );
    if failed == 0 {
        Ok(exit_codes::OK)
    } else {
        Ok(exit_codes::PROGRAM_FAILED)
    }
}

fn matches_filter(script: &Path, filter: Option<&str>) -> bool {
    match filter {
        Some(needle) => script.to_string_lossy().contains(needle),
        None => true,
    }
}
