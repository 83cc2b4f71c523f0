//! I/O backends and helpers for harness commands.

pub mod config;
pub mod discover;
pub mod system;
