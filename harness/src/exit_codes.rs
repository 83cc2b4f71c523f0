//! Stable exit codes for harness and corpus commands.

/// Program evaluated successfully (or every corpus script passed).
pub const OK: i32 = 0;
/// Invalid arguments, config, script path or case file.
pub const INVALID: i32 = 1;
/// The program raised a language-level error (or a corpus script failed).
pub const PROGRAM_FAILED: i32 = 2;
