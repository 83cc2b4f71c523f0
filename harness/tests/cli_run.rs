//! CLI tests for `harness run`.
//!
//! Spawns the harness binary and verifies output and exit codes for
//! successful, failing and invalid invocations.

use std::process::Command;

use harness::exit_codes;
use harness::io::config::{CONFIG_FILE, HarnessConfig, load_config};
use harness::report::RunReport;
use harness::test_support::ScriptDir;

fn harness(dir: &ScriptDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_harness"));
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn run_echo_prints_output_and_result() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("echo.lisp", "(print! (read-line!))").expect("script");
    dir.write("input.txt", "hello\nignored\n").expect("stdin");

    let output = harness(&dir)
        .args(["run", "echo.lisp", "--stdin", "input.txt"])
        .output()
        .expect("harness run");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "hello\n=> \"hello\"\n");
}

#[test]
fn run_json_reports_error_kind() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("bad.lisp", "(print! \"x\") (receive! \"c1\" 1.5)")
        .expect("script");

    let output = harness(&dir)
        .args(["run", "bad.lisp", "--json"])
        .output()
        .expect("harness run");

    assert_eq!(output.status.code(), Some(exit_codes::PROGRAM_FAILED));
    let report: RunReport = serde_json::from_slice(&output.stdout).expect("json report");
    assert!(!report.ok);
    assert_eq!(report.stdout, vec!["x"]);
    assert_eq!(report.error.expect("error").kind, "domain");
}

#[test]
fn run_maps_virtual_files() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("cat.lisp", "(print! (read-file! \"greeting\"))")
        .expect("script");
    dir.write("fixtures/hello.txt", "hi there").expect("fixture");

    let output = harness(&dir)
        .args(["run", "cat.lisp", "--file", "greeting=fixtures/hello.txt"])
        .output()
        .expect("harness run");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("hi there\n"));
}

#[test]
fn run_respects_configured_seed() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("rand.lisp", "(random-bytes! 4)").expect("script");

    let default_run = harness(&dir)
        .args(["run", "rand.lisp"])
        .output()
        .expect("default run");
    dir.write("harness.toml", "seed = 99\n").expect("config");
    let configured_run = harness(&dir)
        .args(["run", "rand.lisp"])
        .output()
        .expect("configured run");
    let flagged_run = harness(&dir)
        .args(["run", "rand.lisp", "--seed", "99"])
        .output()
        .expect("flagged run");

    assert_ne!(default_run.stdout, configured_run.stdout);
    assert_eq!(configured_run.stdout, flagged_run.stdout);
}

#[test]
fn pure_run_has_no_effects() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("io.lisp", "(print! 1)").expect("script");

    let output = harness(&dir)
        .args(["run", "io.lisp", "--pure"])
        .output()
        .expect("harness run");

    assert_eq!(output.status.code(), Some(exit_codes::PROGRAM_FAILED));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error[unbound]"));
    assert!(stderr.contains("hint: print! performs effects"), "{stderr}");
}

#[test]
fn missing_script_is_invalid() {
    let dir = ScriptDir::new().expect("dir");
    let status = harness(&dir)
        .args(["run", "nope.lisp"])
        .status()
        .expect("harness run");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn live_run_reads_real_files() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("main.lisp", "(print! (read-file! \"data.txt\"))")
        .expect("script");
    dir.write("data.txt", "payload").expect("data");

    let output = harness(&dir)
        .args(["live", "main.lisp"])
        .output()
        .expect("harness live");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "payload\n=> \"payload\"\n"
    );
}

#[test]
fn live_run_has_no_test_mode_flag() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("flag.lisp", "*test-mode*").expect("script");

    let output = harness(&dir)
        .args(["live", "flag.lisp"])
        .output()
        .expect("harness live");

    assert_eq!(output.status.code(), Some(exit_codes::PROGRAM_FAILED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unbound symbol: *test-mode*"));
}

#[test]
fn init_writes_a_loadable_config() {
    let dir = ScriptDir::new().expect("dir");
    let output = harness(&dir)
        .args(["init", "--seed", "17"])
        .output()
        .expect("harness init");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let cfg = load_config(&dir.path().join(CONFIG_FILE)).expect("load");
    assert_eq!(
        cfg,
        HarnessConfig {
            seed: 17,
            ..HarnessConfig::default()
        }
    );
}

#[test]
fn init_keeps_an_existing_config_unless_forced() {
    let dir = ScriptDir::new().expect("dir");
    let path = dir.write(CONFIG_FILE, "seed = 5\n").expect("config");

    let refused = harness(&dir).arg("init").status().expect("harness init");
    assert_eq!(refused.code(), Some(exit_codes::INVALID));
    assert_eq!(load_config(&path).expect("load").seed, 5);

    let forced = harness(&dir)
        .args(["init", "--force"])
        .status()
        .expect("harness init --force");
    assert_eq!(forced.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&path).expect("load").seed, 0);
}

#[test]
fn init_ignores_a_broken_existing_config_when_forced() {
    let dir = ScriptDir::new().expect("dir");
    dir.write(CONFIG_FILE, "max_output_lines = 0\n").expect("config");
    let status = harness(&dir)
        .args(["init", "--force"])
        .status()
        .expect("harness init --force");
    assert_eq!(status.code(), Some(exit_codes::OK));
}

#[test]
fn runaway_recursion_exits_with_program_failure() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("loop.lisp", "(def f (fn (n) (f (+ n 1)))) (f 0)")
        .expect("script");

    let output = harness(&dir)
        .args(["run", "loop.lisp"])
        .output()
        .expect("harness run");

    assert_eq!(output.status.code(), Some(exit_codes::PROGRAM_FAILED));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error[depth]"));
}
