//! Language-level errors surfaced as the failure half of a run.

use thiserror::Error;

/// Failure while reading program source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error on line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

/// Error raised while evaluating a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// An argument has the wrong type for a primitive.
    #[error("{callee}: expected {expected}, got {found}")]
    Type {
        callee: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A function was called with the wrong number of arguments.
    #[error("{callee}: expected {expected} argument(s), got {found}")]
    Arity {
        callee: String,
        expected: String,
        found: usize,
    },

    /// An argument has the right type but a value the primitive rejects.
    #[error("{callee}: {message}")]
    Domain { callee: String, message: String },

    #[error("unbound symbol: {0}")]
    Unbound(String),

    #[error("not callable: {0}")]
    NotCallable(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("stdin exhausted")]
    StdinExhausted,

    #[error(transparent)]
    File(#[from] FileError),

    /// Raised by the program itself through `error`.
    #[error("{0}")]
    Raised(String),

    /// The primitive exists but has no backend in this runtime.
    #[error("{0} is unavailable in this runtime")]
    Unavailable(String),

    /// Evaluation nested past the evaluator's depth limit, usually through
    /// unbounded recursion.
    #[error("evaluation nested deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Capability-level file failure, returned by value from a file reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("unable to read {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

impl EvalError {
    /// Every label [`EvalError::kind`] can return.
    pub const KINDS: &'static [&'static str] = &[
        "type",
        "arity",
        "domain",
        "unbound",
        "not_callable",
        "parse",
        "stdin_exhausted",
        "file",
        "raised",
        "unavailable",
        "depth",
    ];

    pub fn type_error(callee: &str, expected: &'static str, found: &'static str) -> Self {
        EvalError::Type {
            callee: callee.to_string(),
            expected,
            found,
        }
    }

    pub fn arity(callee: &str, expected: impl Into<String>, found: usize) -> Self {
        EvalError::Arity {
            callee: callee.to_string(),
            expected: expected.into(),
            found,
        }
    }

    pub fn domain(callee: &str, message: impl Into<String>) -> Self {
        EvalError::Domain {
            callee: callee.to_string(),
            message: message.into(),
        }
    }

    /// Stable label for the error class, used by case expectations and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::Type { .. } => "type",
            EvalError::Arity { .. } => "arity",
            EvalError::Domain { .. } => "domain",
            EvalError::Unbound(_) => "unbound",
            EvalError::NotCallable(_) => "not_callable",
            EvalError::Parse(_) => "parse",
            EvalError::StdinExhausted => "stdin_exhausted",
            EvalError::File(_) => "file",
            EvalError::Raised(_) => "raised",
            EvalError::Unavailable(_) => "unavailable",
            EvalError::DepthExceeded { .. } => "depth",
        }
    }
}
