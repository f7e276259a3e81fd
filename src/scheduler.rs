//! Execution scheduler
//!
//! Owns the lifecycle of learner attempts: one active attempt at a time,
//! cooperative cancellation, the coarse outer timeout around the whole
//! pipeline, and progress recording on success. Starting a new attempt
//! cancels the previous one; a cancelled attempt's late results are
//! discarded, never surfaced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::compiler::{compile, CompilationOutcome, CompileRequest, ReferenceSet, AUXILIARY_TAG};
use crate::config::EngineConfig;
use crate::diagnostics::{remap_clamped, Severity};
use crate::exercise::{Exercise, SqlExercise};
use crate::harness;
use crate::sql;
use crate::verdict::{TimeoutScope, Verdict};

/// Cooperative cancellation flag shared between the scheduler and a running
/// attempt. Cancellation is observed at step boundaries; it never preempts
/// running learner code.
#[derive(Debug, Default)]
pub struct CancelToken {
    flag: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so a waiter arriving after this call
        // still wakes immediately.
        self.notify.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            self.notify.notified().await;
        }
    }
}

/// Coarse phase of the active attempt, for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Compiling,
    Racing,
    Verdicted,
}

/// Persists the learner's progress. The engine only reports; storage lives
/// with the embedding application.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn record_success(&self, exercise_id: &str) -> anyhow::Result<()>;
}

/// Drives attempts end to end. One scheduler per learner session.
pub struct Scheduler {
    config: EngineConfig,
    references: ReferenceSet,
    progress: Option<Arc<dyn ProgressSink>>,
    active: Mutex<Option<Arc<CancelToken>>>,
    state: Mutex<SchedulerState>,
}

impl Scheduler {
    pub fn new(config: EngineConfig, references: ReferenceSet) -> Self {
        Self {
            config,
            references,
            progress: None,
            active: Mutex::new(None),
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock().expect("state lock poisoned")
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.lock().expect("state lock poisoned") = state;
    }

    /// Cancel the active attempt, if any. Idempotent.
    pub fn cancel_attempt(&self) {
        if let Some(token) = self.active.lock().expect("active lock poisoned").as_ref() {
            debug!("cancelling active attempt");
            token.cancel();
        }
    }

    /// Run one attempt to its terminal verdict. Starting an attempt cancels
    /// any attempt still in flight.
    pub async fn start_attempt(&self, exercise: &Exercise, submitted: &str) -> Verdict {
        let token = Arc::new(CancelToken::new());
        {
            let mut active = self.active.lock().expect("active lock poisoned");
            if let Some(previous) = active.replace(token.clone()) {
                previous.cancel();
            }
        }

        self.set_state(SchedulerState::Compiling);
        let verdict = match tokio::time::timeout(
            self.config.outer_timeout,
            self.run_pipeline(exercise, submitted, &token),
        )
        .await
        {
            Ok(verdict) => verdict,
            Err(_elapsed) => {
                warn!(
                    exercise_id = %exercise.id,
                    limit_ms = self.config.outer_timeout.as_millis() as u64,
                    "attempt exceeded the outer time bound"
                );
                Verdict::Timeout {
                    scope: TimeoutScope::Attempt,
                }
            }
        };
        self.set_state(SchedulerState::Verdicted);

        if verdict.is_success() {
            if let Some(sink) = &self.progress {
                if let Err(error) = sink.record_success(&exercise.id).await {
                    warn!(exercise_id = %exercise.id, %error, "failed to record progress");
                }
            }
        }

        {
            let mut active = self.active.lock().expect("active lock poisoned");
            if active.as_ref().map(|t| Arc::ptr_eq(t, &token)).unwrap_or(false) {
                *active = None;
            }
        }
        info!(exercise_id = %exercise.id, verdict = verdict.kind(), "attempt finished");
        self.set_state(SchedulerState::Idle);
        verdict
    }

    async fn run_pipeline(
        &self,
        exercise: &Exercise,
        submitted: &str,
        token: &Arc<CancelToken>,
    ) -> Verdict {
        if token.is_cancelled() {
            return Verdict::Cancelled;
        }

        let request = CompileRequest {
            exercise_id: exercise.id.clone(),
            main_text: submitted.to_string(),
            auxiliary: exercise.auxiliary.clone(),
            shape: exercise.shape.clone(),
            references: self.references.clone(),
        };
        let compile_handle = tokio::task::spawn_blocking(move || compile(request));

        let outcome = tokio::select! {
            joined = compile_handle => match joined {
                Ok(outcome) => outcome,
                Err(error) => {
                    return Verdict::RuntimeFault {
                        message: format!("compilation worker failed: {}", error),
                    }
                }
            },
            _ = token.cancelled() => {
                debug!(exercise_id = %exercise.id, "cancelled during compilation; late result discarded");
                return Verdict::Cancelled;
            }
        };

        match outcome {
            CompilationOutcome::Diagnostics {
                diagnostics,
                header_lines,
            } => {
                // Fragment diagnostics carry fragment-relative lines; only
                // positions in the learner's synthesized source get remapped.
                let errors: Vec<_> = diagnostics
                    .into_iter()
                    .filter(|d| d.severity == Severity::Error)
                    .map(|mut d| {
                        if !d.message.starts_with(AUXILIARY_TAG) {
                            d.line = remap_clamped(d.line, header_lines);
                        }
                        d
                    })
                    .collect();
                Verdict::CompileError { diagnostics: errors }
            }
            CompilationOutcome::Unit { unit, warnings, .. } => {
                for warning in &warnings {
                    debug!(exercise_id = %exercise.id, %warning, "compile warning");
                }
                self.set_state(SchedulerState::Racing);
                harness::evaluate(exercise, &unit, token, &self.config).await
            }
        }
    }

    /// Run one data-track attempt. Synchronous: the sandbox is an in-memory
    /// database and completes in bounded time.
    pub fn run_query_attempt(&self, exercise: &SqlExercise, statement: &str) -> Verdict {
        let run = match sql::run_query(
            &exercise.setup,
            statement,
            exercise.verification.as_deref(),
        ) {
            Ok(run) => run,
            Err(error) => {
                return Verdict::RuntimeFault {
                    message: format!("SQL error: {}", error),
                }
            }
        };

        if sql::rowsets_equal(&run.rows, &exercise.expected) {
            let feedback = match run.rows_affected {
                Some(n) => format!("{} ({} rows affected)", exercise.success_feedback, n),
                None => exercise.success_feedback.clone(),
            };
            Verdict::Success { feedback }
        } else {
            debug!(
                exercise_id = %exercise.id,
                actual_rows = run.rows.len(),
                expected_rows = exercise.expected.len(),
                "row sets differ"
            );
            Verdict::ContractViolation {
                hint: "The result does not match the expected outcome.".to_string(),
            }
        }
    }
}
