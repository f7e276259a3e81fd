//! Verdict taxonomy for learner attempts
//!
//! Every attempt ends in exactly one terminal `Verdict`. Nothing in the
//! evaluation pipeline is allowed to escape as an unhandled fault: compile
//! errors, contract violations, learner exceptions, timeouts and user
//! cancellation all reduce to a variant here.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::diagnostics::Diagnostic;

/// Which timeout layer fired.
///
/// `Attempt` is the coarse outer bound around the whole compile+assert run;
/// `Step` is the fine-grained bound around one scripted interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutScope {
    Attempt,
    Step,
}

/// Terminal outcome of one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// The submission satisfies the exercise contract.
    Success { feedback: String },
    /// A required type/member is missing or behaves incorrectly.
    ContractViolation { hint: String },
    /// Learner code raised an exception; `message` is the innermost cause.
    RuntimeFault { message: String },
    /// A timeout layer fired. The worker was abandoned, not terminated.
    Timeout { scope: TimeoutScope },
    /// The user cancelled the attempt. Not an error.
    Cancelled,
    /// Compilation produced error-severity diagnostics (already remapped to
    /// learner-visible lines).
    CompileError { diagnostics: Vec<Diagnostic> },
}

impl Verdict {
    pub fn is_success(&self) -> bool {
        matches!(self, Verdict::Success { .. })
    }

    /// Stable kind string, used in logs and by the UI.
    pub fn kind(&self) -> &'static str {
        match self {
            Verdict::Success { .. } => "success",
            Verdict::ContractViolation { .. } => "contract_violation",
            Verdict::RuntimeFault { .. } => "runtime_fault",
            Verdict::Timeout { .. } => "timeout",
            Verdict::Cancelled => "cancelled",
            Verdict::CompileError { .. } => "compile_error",
        }
    }

    /// Serialize for the UI event stream.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Timeout {
                scope: TimeoutScope::Step,
            } => write!(f, "timeout (step)"),
            Verdict::Timeout {
                scope: TimeoutScope::Attempt,
            } => write!(f, "timeout (attempt)"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings() {
        let v = Verdict::Success {
            feedback: "ok".into(),
        };
        assert_eq!(v.kind(), "success");
        assert!(v.is_success());

        let v = Verdict::Timeout {
            scope: TimeoutScope::Step,
        };
        assert_eq!(v.to_string(), "timeout (step)");
        assert!(!v.is_success());
    }

    #[test]
    fn test_serde_tagging() {
        let v = Verdict::ContractViolation {
            hint: "missing constructor".into(),
        };
        let json = v.to_json().unwrap();
        assert!(json.contains("\"kind\":\"contract_violation\""));

        let back: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
