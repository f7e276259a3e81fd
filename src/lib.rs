//! EliteCode evaluation engine
//!
//! Sandboxed evaluation for an interactive programming tutor. A learner
//! submission travels one pipeline: compile the text into an isolated
//! [`lang::LoadedUnit`], drive the tutor-authored scenario against it under
//! two timeout layers, and reduce every outcome to a terminal
//! [`Verdict`]. A parallel data track runs SQL attempts against an
//! ephemeral in-memory database and compares result grids.
//!
//! - [`scheduler::Scheduler`] is the entry point: one attempt at a time,
//!   cooperative cancellation, progress reporting.
//! - [`compiler`] turns learner text (plus injected boilerplate) into a
//!   unit or diagnostics with remappable line positions.
//! - [`harness`] executes scenario scripts through capability lookups.
//! - [`sql`] is the data track: sandbox, dialect shims, row-set comparison.

pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod exercise;
pub mod harness;
pub mod lang;
pub mod scheduler;
pub mod sql;
pub mod timeout;
pub mod util;
pub mod verdict;

pub use compiler::{analyze, compile, CompilationOutcome, CompileRequest, ReferenceSet, SourceShape};
pub use config::EngineConfig;
pub use diagnostics::{Diagnostic, Severity};
pub use exercise::{Exercise, HintStyle, SqlExercise};
pub use scheduler::{CancelToken, ProgressSink, Scheduler, SchedulerState};
pub use verdict::{TimeoutScope, Verdict};
