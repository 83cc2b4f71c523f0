//! Runs programs against a fresh simulated state.
//!
//! Each call builds its own [`TestState`], evaluates the program and returns
//! the outcome together with the captured output. The state never outlives
//! the call.

use tracing::{debug, instrument};

use crate::capability::Runtime;
use crate::core::entropy::DEFAULT_SEED;
use crate::core::error::EvalError;
use crate::core::reader::read_program;
use crate::core::state::{TestState, VirtualFiles};
use crate::core::value::Value;
use crate::env::{BaseEnv, pure_env};
use crate::eval::Evaluator;

/// Evaluation outcome: the program's final value or the first error it raised.
pub type Outcome = Result<Value, EvalError>;

/// Inputs for a single simulated run.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Lines served to `read-line!`, front first.
    pub stdin: Vec<String>,
    /// Files visible to `read-file!`.
    pub files: VirtualFiles,
    /// Program source.
    pub source: String,
    /// Seed for `random-bytes!`.
    pub seed: u64,
}

impl RunRequest {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            seed: DEFAULT_SEED,
            ..Self::default()
        }
    }

    pub fn with_stdin(mut self, stdin: Vec<String>) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_files(mut self, files: VirtualFiles) -> Self {
        self.files = files;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Parse `source` and evaluate it against `host` using `env`'s primitives.
///
/// `host` already carries its starting bindings.
pub fn execute<H: Runtime>(env: &BaseEnv<H>, host: &mut H, source: &str) -> Outcome {
    let forms = read_program(source)?;
    debug!(forms = forms.len(), "program parsed");
    Evaluator::new(env.primitives()).eval_program(host, &forms)
}

/// Run a request against a fresh state; returns the outcome and captured stdout.
#[instrument(skip_all, fields(stdin_lines = request.stdin.len(), files = request.files.len(), seed = request.seed))]
pub fn run_request(env: &BaseEnv<TestState>, request: RunRequest) -> (Outcome, Vec<String>) {
    let RunRequest {
        stdin,
        files,
        source,
        seed,
    } = request;
    let mut state = TestState::with_seed(stdin, files, env.bindings().clone(), seed);
    let outcome = execute(env, &mut state, &source);
    debug!(
        unread_stdin = state.remaining_stdin(),
        ids_issued = state.uuid_counter(),
        addresses = ?state.chain_logs().addresses().collect::<Vec<_>>(),
        "final state"
    );
    match &outcome {
        Ok(value) => debug!(result = %value, output_lines = state.stdout().len(), "run finished"),
        Err(err) => debug!(error = %err, kind = err.kind(), "run failed"),
    }
    (outcome, state.into_stdout())
}

/// Run with stdin lines and virtual files.
pub fn run_program_with_files(
    env: &BaseEnv<TestState>,
    stdin: Vec<String>,
    files: VirtualFiles,
    source: &str,
) -> (Outcome, Vec<String>) {
    run_request(
        env,
        RunRequest::new(source).with_stdin(stdin).with_files(files),
    )
}

/// Run with stdin lines and no files.
pub fn run_program(
    env: &BaseEnv<TestState>,
    stdin: Vec<String>,
    source: &str,
) -> (Outcome, Vec<String>) {
    run_program_with_files(env, stdin, VirtualFiles::new(), source)
}

/// Run with no stdin, discarding captured output.
pub fn eval_program(env: &BaseEnv<TestState>, source: &str) -> Outcome {
    run_program(env, Vec::new(), source).0
}

/// Evaluate a program that performs no effects, using the pure environment.
pub fn eval_pure(source: &str) -> Outcome {
    eval_program(&pure_env(), source)
}
