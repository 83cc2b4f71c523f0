//! Production capabilities backed by the real process environment.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::warn;
use uuid::Uuid;

use crate::capability::{ByteSource, FileReader, IdSource, LineSink, LineSource, Runtime};
use crate::core::error::FileError;
use crate::core::value::Bindings;

/// Real stdin/stdout, files under `root`, OS entropy and v4 UUIDs.
pub struct SystemHost {
    root: PathBuf,
    environment: Bindings,
}

impl SystemHost {
    pub fn new(root: impl Into<PathBuf>, environment: Bindings) -> Self {
        Self {
            root: root.into(),
            environment,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LineSource for SystemHost {
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let trimmed = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(trimmed);
                Some(line)
            }
            Err(err) => {
                warn!(err = %err, "stdin read failed");
                None
            }
        }
    }
}

impl LineSink for SystemHost {
    fn emit_line(&mut self, line: String) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{line}") {
            warn!(err = %err, "stdout write failed");
        }
    }
}

impl FileReader for SystemHost {
    fn read_file(&self, path: &str) -> Result<String, FileError> {
        let full = self.root.join(path);
        fs::read_to_string(&full).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound {
                path: path.to_string(),
            },
            _ => FileError::Unreadable {
                path: path.to_string(),
                reason: err.to_string(),
            },
        })
    }
}

impl ByteSource for SystemHost {
    fn draw_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; n];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    }
}

impl IdSource for SystemHost {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl Runtime for SystemHost {
    fn bindings(&self) -> &Bindings {
        &self.environment
    }

    fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.environment
    }
}
