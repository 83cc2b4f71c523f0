//! In-memory state simulating every effect for a single run.
//!
//! A [`TestState`] is created fresh for each run and dropped when the run
//! returns. It implements each capability trait directly, so the evaluator
//! drives it exactly as it would drive real I/O.

use std::collections::{BTreeMap, VecDeque};

use crate::capability::{ByteSource, FileReader, IdSource, LineSink, LineSource, Runtime};
use crate::core::chain::ChainLogs;
use crate::core::entropy::{ByteGenerator, DEFAULT_SEED, SeededBytes};
use crate::core::error::FileError;
use crate::core::value::Bindings;

/// Virtual file system: path to content, read-only during a run.
pub type VirtualFiles = BTreeMap<String, String>;

/// Prefix for identifiers from the simulated id source.
pub const ID_PREFIX: &str = "uuid-";

#[derive(Debug, Clone)]
pub struct TestState {
    stdin: VecDeque<String>,
    stdout: Vec<String>,
    environment: Bindings,
    virtual_files: VirtualFiles,
    random: SeededBytes,
    uuid_counter: u64,
    chain_logs: ChainLogs,
}

impl TestState {
    /// Fresh state seeded with the fixed default seed.
    pub fn new(stdin: Vec<String>, virtual_files: VirtualFiles, environment: Bindings) -> Self {
        Self::with_seed(stdin, virtual_files, environment, DEFAULT_SEED)
    }

    pub fn with_seed(
        stdin: Vec<String>,
        virtual_files: VirtualFiles,
        environment: Bindings,
        seed: u64,
    ) -> Self {
        Self {
            stdin: stdin.into(),
            stdout: Vec::new(),
            environment,
            virtual_files,
            random: SeededBytes::new(seed),
            uuid_counter: 0,
            chain_logs: ChainLogs::new(),
        }
    }

    /// Captured output, oldest first.
    pub fn stdout(&self) -> &[String] {
        &self.stdout
    }

    pub fn into_stdout(self) -> Vec<String> {
        self.stdout
    }

    /// Lines not yet consumed.
    pub fn remaining_stdin(&self) -> usize {
        self.stdin.len()
    }

    pub fn uuid_counter(&self) -> u64 {
        self.uuid_counter
    }

    pub fn chain_logs(&self) -> &ChainLogs {
        &self.chain_logs
    }

    pub fn chain_logs_mut(&mut self) -> &mut ChainLogs {
        &mut self.chain_logs
    }
}

impl LineSource for TestState {
    fn next_line(&mut self) -> Option<String> {
        self.stdin.pop_front()
    }
}

impl LineSink for TestState {
    fn emit_line(&mut self, line: String) {
        self.stdout.push(line);
    }
}

impl FileReader for TestState {
    fn read_file(&self, path: &str) -> Result<String, FileError> {
        self.virtual_files
            .get(path)
            .cloned()
            .ok_or_else(|| FileError::NotFound {
                path: path.to_string(),
            })
    }
}

impl ByteSource for TestState {
    fn draw_bytes(&mut self, n: usize) -> Vec<u8> {
        let (bytes, next) = self.random.draw(n);
        self.random = next;
        bytes
    }
}

impl IdSource for TestState {
    fn next_id(&mut self) -> String {
        let id = format!("{ID_PREFIX}{}", self.uuid_counter);
        self.uuid_counter += 1;
        id
    }
}

impl Runtime for TestState {
    fn bindings(&self) -> &Bindings {
        &self.environment
    }

    fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.environment
    }
}
