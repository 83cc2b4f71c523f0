//! Effect capabilities consumed by the evaluator.
//!
//! Every effect a program can perform goes through one of these traits. There
//! are exactly two backends: [`TestState`](crate::core::state::TestState) for
//! deterministic runs and [`SystemHost`](crate::io::system::SystemHost) for
//! real I/O. The evaluator only sees the traits.

use crate::core::error::FileError;
use crate::core::value::Bindings;

/// Source of input lines.
pub trait LineSource {
    /// Next line, or `None` once input is exhausted.
    fn next_line(&mut self) -> Option<String>;
}

/// Sink for output lines.
pub trait LineSink {
    fn emit_line(&mut self, line: String);
}

pub trait FileReader {
    fn read_file(&self, path: &str) -> Result<String, FileError>;
}

/// Source of random bytes.
pub trait ByteSource {
    /// Exactly `n` bytes.
    fn draw_bytes(&mut self, n: usize) -> Vec<u8>;
}

/// Source of unique string identifiers.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Every capability at once.
pub trait Capabilities: LineSource + LineSink + FileReader + ByteSource + IdSource {}

impl<T> Capabilities for T where T: LineSource + LineSink + FileReader + ByteSource + IdSource {}

/// Execution context for the evaluator: capabilities plus program bindings.
pub trait Runtime: Capabilities {
    fn bindings(&self) -> &Bindings;
    fn bindings_mut(&mut self) -> &mut Bindings;
}
