//! Deterministic effect simulation for testing the embedded language runtime.
//!
//! Programs perform effects (console I/O, file reads, randomness, unique ids
//! and message passing) only through capability traits. This crate supplies a
//! fully in-memory, seedable implementation of those effects so programs can be
//! run and asserted on exactly:
//!
//! - **[`core`]**: Pure, deterministic logic (values, reader, chain logs,
//!   seeded bytes, the per-run [`TestState`](core::state::TestState)).
//! - **[`io`]**: Side-effecting backends (real stdin/stdout/files/entropy,
//!   config loading, script discovery).
//!
//! Orchestration modules ([`env`], [`run`], [`bus`]) assemble environments and
//! execute programs against a fresh state per run.

pub mod bus;
pub mod capability;
pub mod core;
pub mod env;
pub mod eval;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod report;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
