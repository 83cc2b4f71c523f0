//! CLI tests for `corpus list` and `corpus run`.

use std::path::PathBuf;
use std::process::Command;

use harness::exit_codes;
use harness::test_support::ScriptDir;

fn corpus(dir: &ScriptDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_corpus"));
    cmd.current_dir(dir.path());
    cmd
}

fn shipped_scripts() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scripts")
}

#[test]
fn shipped_scripts_all_pass() {
    let dir = ScriptDir::new().expect("dir");
    let output = corpus(&dir)
        .arg("run")
        .arg("--root")
        .arg(shipped_scripts())
        .output()
        .expect("corpus run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{stdout}");
    assert!(stdout.contains("failed=0"), "{stdout}");
    assert!(!stdout.contains("FAIL:"), "{stdout}");
}

#[test]
fn list_prints_relative_paths_sorted() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("scripts/b.lisp", "1").expect("script");
    dir.write("scripts/a/c.lisp", "2").expect("script");
    dir.write("scripts/a/c.toml", "").expect("case");

    let output = corpus(&dir).arg("list").output().expect("corpus list");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["a/c.lisp", "b.lisp"]);
}

#[test]
fn failing_script_is_reported() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("scripts/ok.lisp", "(+ 1 2)").expect("script");
    dir.write("scripts/ok.toml", "expect_result = \"3\"\n")
        .expect("case");
    dir.write("scripts/wrong.lisp", "(print! \"a\")").expect("script");
    dir.write("scripts/wrong.toml", "expect_output = [\"b\"]\n")
        .expect("case");

    let output = corpus(&dir).arg("run").output().expect("corpus run");

    assert_eq!(output.status.code(), Some(exit_codes::PROGRAM_FAILED));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pass: ok.lisp"), "{stdout}");
    assert!(stdout.contains("FAIL: wrong.lisp"), "{stdout}");
    assert!(stdout.contains("passed=1 failed=1"), "{stdout}");
}

#[test]
fn filter_selects_scripts() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("scripts/keep/a.lisp", "1").expect("script");
    dir.write("scripts/skip/b.lisp", "(error \"boom\")")
        .expect("script");

    let output = corpus(&dir)
        .args(["run", "--filter", "keep"])
        .output()
        .expect("corpus run");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&output.stdout).contains("scripts=1 passed=1"));
}

#[test]
fn invalid_case_file_is_invalid() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("scripts/a.lisp", "1").expect("script");
    dir.write("scripts/a.toml", "expect_error = \"nonsense\"\n")
        .expect("case");

    let status = corpus(&dir).arg("run").status().expect("corpus run");
    assert_eq!(status.code(), Some(exit_codes::INVALID));
}

#[test]
fn config_sets_scripts_dir() {
    let dir = ScriptDir::new().expect("dir");
    dir.write("harness.toml", "scripts_dir = \"suite\"\n")
        .expect("config");
    dir.write("suite/only.lisp", "1").expect("script");

    let output = corpus(&dir).arg("list").output().expect("corpus list");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "only.lisp\n");
}
