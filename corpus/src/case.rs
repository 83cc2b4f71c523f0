//! Case file parsing and validation.
//!
//! Each script `name.lisp` may have a sidecar `name.toml` describing its
//! inputs and expectations. See `corpus/scripts/` for examples.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use harness::core::error::EvalError;
use serde::Deserialize;

/// Inputs and expectations for one script.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CaseFile {
    /// Lines served to `read-line!`.
    pub stdin: Vec<String>,
    /// Virtual files visible to `read-file!`.
    pub files: BTreeMap<String, String>,
    /// Seed override for `random-bytes!`.
    pub seed: Option<u64>,
    /// Exact captured output, when checked.
    pub expect_output: Option<Vec<String>>,
    /// Printed form of the final value, when checked.
    pub expect_result: Option<String>,
    /// Error kind the script must fail with (see `EvalError::kind`).
    pub expect_error: Option<String>,
}

impl CaseFile {
    /// Load the sidecar case for `script`, or the empty case if none exists.
    pub fn load_for(script: &Path) -> Result<Self> {
        let path = sidecar_path(script);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read case {}", path.display()))?;
        Self::parse_str(&contents).with_context(|| format!("case {}", path.display()))
    }

    pub fn parse_str(contents: &str) -> Result<Self> {
        let case: CaseFile = toml::from_str(contents).context("parse case")?;
        case.validate()?;
        Ok(case)
    }

    fn validate(&self) -> Result<()> {
        if self.expect_result.is_some() && self.expect_error.is_some() {
            bail!("expect_result and expect_error are mutually exclusive");
        }
        if let Some(kind) = &self.expect_error
            && !EvalError::KINDS.contains(&kind.as_str())
        {
            bail!(
                "expect_error {:?} is not one of {}",
                kind,
                EvalError::KINDS.join(", ")
            );
        }
        for path in self.files.keys() {
            if path.trim().is_empty() {
                bail!("files keys must be non-empty");
            }
        }
        Ok(())
    }
}

/// `dir/name.lisp` -> `dir/name.toml`.
pub fn sidecar_path(script: &Path) -> PathBuf {
    script.with_extension("toml")
}
