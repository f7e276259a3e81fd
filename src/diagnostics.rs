//! Compiler diagnostics and source-position remapping
//!
//! The compilation service injects synthetic boilerplate (a `using` prelude
//! and, for method-body exercises, an enclosing class) ahead of the learner's
//! text. Diagnostics therefore carry raw lines relative to the full
//! synthesized source and must be remapped before the learner sees them.
//!
//! Two remapping behaviors exist on purpose:
//! - the post-run error listing clamps header positions to line 0,
//! - the live underlining pass silently drops them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// One compiler diagnostic. `line` is 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: usize,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: usize) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line,
        }
    }

    pub fn warning(message: impl Into<String>, line: usize) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "line {}: {}: {}", self.line, tag, self.message)
    }
}

/// Remap a raw line to a learner-visible line, clamping boilerplate
/// positions to 0. Used by the post-run error listing.
///
/// `remap_clamped(raw, header) = max(0, raw - header)`
pub fn remap_clamped(raw_line: usize, header_lines: usize) -> usize {
    raw_line.saturating_sub(header_lines)
}

/// Remap a raw line to a learner-visible line, discarding positions that
/// fall inside the injected boilerplate. Used by live underlining so the
/// editor never marks text the learner cannot see.
pub fn remap_live(raw_line: usize, header_lines: usize) -> Option<usize> {
    raw_line.checked_sub(header_lines)
}

/// Clamp-remap a batch of diagnostics, preserving order.
pub fn remap_all(diagnostics: &[Diagnostic], header_lines: usize) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .map(|d| Diagnostic {
            severity: d.severity,
            message: d.message.clone(),
            line: remap_clamped(d.line, header_lines),
        })
        .collect()
}
