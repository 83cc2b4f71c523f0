//! Serializable summary of a run, for `--json` output and corpus results.

use serde::{Deserialize, Serialize};

use crate::run::Outcome;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub ok: bool,
    /// Printed form of the final value on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
    pub stdout: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: String,
    pub message: String,
}

impl RunReport {
    pub fn new(outcome: &Outcome, stdout: Vec<String>) -> Self {
        match outcome {
            Ok(value) => Self {
                ok: true,
                result: Some(value.to_string()),
                error: None,
                stdout,
            },
            Err(err) => Self {
                ok: false,
                result: None,
                error: Some(ErrorReport {
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                }),
                stdout,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::EvalError;
    use crate::core::value::Value;

    #[test]
    fn success_report_omits_error() {
        let report = RunReport::new(&Ok(Value::str("hi")), vec!["hi".to_string()]);
        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(
            json,
            serde_json::json!({"ok": true, "result": "\"hi\"", "stdout": ["hi"]})
        );
    }

    #[test]
    fn failure_report_carries_kind() {
        let err = EvalError::domain("receive!", "expecting int argument");
        let report = RunReport::new(&Err(err), Vec::new());
        let error = report.error.expect("error");
        assert_eq!(error.kind, "domain");
        assert_eq!(error.message, "receive!: expecting int argument");
        assert!(report.result.is_none());
    }
}
