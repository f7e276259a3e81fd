//! Runtime faults raised while executing learner code

use thiserror::Error;

/// A fault raised during interpretation of learner code.
///
/// Crossing a method-invocation boundary wraps the callee's fault in
/// `InMethod`; `innermost()` strips those frames back off so the learner
/// sees the root cause rather than a generic "invocation failed" shell.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("null reference: {0}")]
    NullReference(String),

    #[error("unknown name '{0}'")]
    UnknownName(String),

    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("class '{class}' has no method '{method}'")]
    UnknownMethod { class: String, method: String },

    #[error("class '{class}' has no field '{field}'")]
    UnknownField { class: String, field: String },

    #[error("no constructor of '{class}' takes {arity} argument(s)")]
    NoMatchingConstructor { class: String, arity: usize },

    #[error("cannot instantiate abstract class '{0}'")]
    AbstractInstantiation(String),

    #[error("method '{class}.{method}' is abstract and has no body")]
    AbstractMethodCall { class: String, method: String },

    #[error("method '{class}.{method}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        class: String,
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("type error: {0}")]
    Type(String),

    #[error("list index {index} out of bounds (size {size})")]
    IndexOutOfBounds { index: i64, size: usize },

    #[error("in '{frame}': {source}")]
    InMethod {
        frame: String,
        #[source]
        source: Box<ExecError>,
    },
}

impl ExecError {
    /// Strip invocation frames down to the root cause.
    pub fn innermost(&self) -> &ExecError {
        let mut current = self;
        while let ExecError::InMethod { source, .. } = current {
            current = source;
        }
        current
    }

    /// Wrap this fault with an invocation frame.
    pub fn in_frame(self, frame: impl Into<String>) -> ExecError {
        ExecError::InMethod {
            frame: frame.into(),
            source: Box::new(self),
        }
    }
}
