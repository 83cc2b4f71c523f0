//! Test-only helpers for building run inputs and script fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::state::VirtualFiles;
use crate::core::value::Value;
use crate::env::test_env;
use crate::run::run_program_with_files;

/// Owned stdin lines from string literals.
pub fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Virtual file map from `(path, content)` pairs.
pub fn virtual_files(entries: &[(&str, &str)]) -> VirtualFiles {
    entries
        .iter()
        .map(|(path, content)| (path.to_string(), content.to_string()))
        .collect()
}

/// Run `source` in the test environment, panicking on a language error.
pub fn run_ok(stdin: &[&str], files: &[(&str, &str)], source: &str) -> (Value, Vec<String>) {
    let (outcome, stdout) =
        run_program_with_files(&test_env(), lines(stdin), virtual_files(files), source);
    match outcome {
        Ok(value) => (value, stdout),
        Err(err) => panic!("program failed: {err}\nsource:\n{source}"),
    }
}

/// Temporary directory holding script files for CLI and corpus tests.
pub struct ScriptDir {
    dir: TempDir,
}

impl ScriptDir {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}
