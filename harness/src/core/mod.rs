//! Deterministic, pure logic shared by the harness.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod chain;
pub mod entropy;
pub mod error;
pub mod reader;
pub mod state;
pub mod value;
