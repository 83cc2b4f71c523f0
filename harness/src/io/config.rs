//! Harness configuration stored in `harness.toml`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::entropy::DEFAULT_SEED;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "harness.toml";

/// Harness configuration (TOML).
///
/// Missing fields default to the values a fresh checkout expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    /// Seed for simulated `random-bytes!` draws.
    pub seed: u64,

    /// Directory searched for corpus scripts.
    pub scripts_dir: PathBuf,

    /// Script file extension, without the leading dot.
    pub script_extension: String,

    /// Stop printing captured output beyond this many lines.
    pub max_output_lines: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            scripts_dir: PathBuf::from("scripts"),
            script_extension: "lisp".to_string(),
            max_output_lines: 10_000,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.scripts_dir.as_os_str().is_empty() {
            return Err(anyhow!("scripts_dir must be non-empty"));
        }
        let ext = self.script_extension.trim();
        if ext.is_empty() {
            return Err(anyhow!("script_extension must be non-empty"));
        }
        if ext.starts_with('.') {
            return Err(anyhow!("script_extension must not start with '.'"));
        }
        if self.max_output_lines == 0 {
            return Err(anyhow!("max_output_lines must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `HarnessConfig::default()`.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    if !path.exists() {
        let cfg = HarnessConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: HarnessConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Comment placed above the serialized fields.
const CONFIG_HEADER: &str = "# Harness configuration. Missing fields take their defaults.\n\n";

/// Serialize `cfg` to `path`, replacing any existing file in a single rename.
pub fn write_config(path: &Path, cfg: &HarnessConfig) -> Result<()> {
    cfg.validate()?;
    let body = toml::to_string_pretty(cfg).context("serialize config toml")?;
    replace_file(path, &format!("{CONFIG_HEADER}{body}"))
}

fn replace_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let staging = path.with_extension("toml.partial");
    let mut file =
        fs::File::create(&staging).with_context(|| format!("create {}", staging.display()))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.sync_all())
        .with_context(|| format!("write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("move {} into place", staging.display()))?;
    Ok(())
}
