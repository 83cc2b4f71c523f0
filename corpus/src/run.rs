//! Script execution against the simulated test environment.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use harness::core::state::TestState;
use harness::env::BaseEnv;
use harness::run::{RunRequest, run_request};
use tracing::{debug, instrument};

use crate::case::CaseFile;
use crate::outcome::{Verdict, judge};

/// Result of running a single script.
#[derive(Debug)]
pub struct ScriptRun {
    /// Script path relative to the corpus root.
    pub script: PathBuf,
    pub verdict: Verdict,
}

/// Run `root/relative` with its sidecar case and judge the outcome.
///
/// `default_seed` applies when the case does not pin one.
#[instrument(skip_all, fields(script = %relative.display()))]
pub fn run_script(
    env: &BaseEnv<TestState>,
    root: &Path,
    relative: &Path,
    default_seed: u64,
) -> Result<ScriptRun> {
    let path = root.join(relative);
    let source =
        fs::read_to_string(&path).with_context(|| format!("read script {}", path.display()))?;
    let case = CaseFile::load_for(&path).context("load case")?;
    debug!(
        stdin_lines = case.stdin.len(),
        files = case.files.len(),
        "case loaded"
    );

    let request = RunRequest::new(source)
        .with_stdin(case.stdin.clone())
        .with_files(case.files.clone())
        .with_seed(case.seed.unwrap_or(default_seed));
    let (outcome, stdout) = run_request(env, request);
    let verdict = judge(&case, &outcome, &stdout);
    debug!(passed = verdict.passed(), "script judged");

    Ok(ScriptRun {
        script: relative.to_path_buf(),
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use harness::env::test_env;
    use harness::test_support::ScriptDir;

    #[test]
    fn passes_with_matching_sidecar() {
        let dir = ScriptDir::new().expect("dir");
        dir.write("echo.lisp", "(print! (read-line!))")
            .expect("script");
        dir.write(
            "echo.toml",
            "stdin = [\"hi\"]\nexpect_output = [\"hi\"]\nexpect_result = '\"hi\"'\n",
        )
        .expect("case");

        let run = run_script(&test_env(), dir.path(), Path::new("echo.lisp"), 0).expect("run");
        assert_eq!(run.verdict, Verdict::Pass);
        assert_eq!(run.script, PathBuf::from("echo.lisp"));
    }

    #[test]
    fn case_seed_overrides_default() {
        let dir = ScriptDir::new().expect("dir");
        let env = test_env();
        dir.write("rand.lisp", "(random-bytes! 8)").expect("script");
        let expected = {
            let request = RunRequest::new("(random-bytes! 8)").with_seed(7);
            run_request(&env, request).0.expect("draw").to_string()
        };
        dir.write(
            "rand.toml",
            &format!("seed = 7\nexpect_result = {expected:?}\n"),
        )
        .expect("case");

        let run = run_script(&env, dir.path(), Path::new("rand.lisp"), 0).expect("run");
        assert!(run.verdict.passed(), "{:?}", run.verdict);
    }

    #[test]
    fn missing_script_is_an_error() {
        let dir = ScriptDir::new().expect("dir");
        assert!(run_script(&test_env(), dir.path(), Path::new("nope.lisp"), 0).is_err());
    }
}
