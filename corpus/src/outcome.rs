//! Judging a script run against its case expectations.

use harness::run::Outcome;

use crate::case::CaseFile;

/// Result of checking one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Every expectation that did not hold, in check order.
    Fail(Vec<String>),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Compare a run against the case.
///
/// With no `expect_error`, the script must succeed.
pub fn judge(case: &CaseFile, outcome: &Outcome, stdout: &[String]) -> Verdict {
    let mut failures = Vec::new();

    match (&case.expect_error, outcome) {
        (Some(kind), Err(err)) if err.kind() == kind => {}
        (Some(kind), Err(err)) => {
            failures.push(format!("expected {kind} error, got {} error: {err}", err.kind()));
        }
        (Some(kind), Ok(value)) => {
            failures.push(format!("expected {kind} error, got value {value}"));
        }
        (None, Err(err)) => failures.push(format!("unexpected {} error: {err}", err.kind())),
        (None, Ok(value)) => {
            if let Some(expected) = &case.expect_result
                && value.to_string() != *expected
            {
                failures.push(format!("expected result {expected}, got {value}"));
            }
        }
    }

    if let Some(expected) = &case.expect_output
        && expected.as_slice() != stdout
    {
        failures.push(format!("expected output {expected:?}, got {stdout:?}"));
    }

    if failures.is_empty() {
        Verdict::Pass
    } else {
        Verdict::Fail(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harness::core::error::EvalError;
    use harness::core::value::Value;

    fn case() -> CaseFile {
        CaseFile::default()
    }

    #[test]
    fn pass_when_result_and_output_match() {
        let case = CaseFile {
            expect_result: Some("3".to_string()),
            expect_output: Some(vec!["x".to_string()]),
            ..case()
        };
        let verdict = judge(&case, &Ok(Value::Int(3)), &["x".to_string()]);
        assert_eq!(verdict, Verdict::Pass);
    }

    #[test]
    fn fail_lists_every_mismatch() {
        let case = CaseFile {
            expect_result: Some("3".to_string()),
            expect_output: Some(Vec::new()),
            ..case()
        };
        let Verdict::Fail(reasons) = judge(&case, &Ok(Value::Int(4)), &["x".to_string()]) else {
            panic!("expected failure");
        };
        assert_eq!(reasons.len(), 2);
    }

    #[test]
    fn unexpected_error_fails() {
        let verdict = judge(&case(), &Err(EvalError::StdinExhausted), &[]);
        assert!(!verdict.passed());
    }

    #[test]
    fn expected_error_kind_passes() {
        let case = CaseFile {
            expect_error: Some("domain".to_string()),
            ..case()
        };
        let err = EvalError::domain("receive!", "expecting int argument");
        assert!(judge(&case, &Err(err), &[]).passed());
        assert!(!judge(&case, &Ok(Value::Nil), &[]).passed());
        assert!(!judge(&case, &Err(EvalError::StdinExhausted), &[]).passed());
    }
}
