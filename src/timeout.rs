//! Timeout guard - race-and-abandon execution bound
//!
//! Runs an arbitrary blocking operation on a worker and races it against a
//! timer; whichever finishes first wins. The loser is abandoned: learner code
//! offers no safe preemption point, so a worker stuck in a tight loop is
//! detached and left to run (possibly forever). This is a deliberate,
//! documented resource cost bounded by the one-attempt-per-session model,
//! not a correctness hazard - an abandoned worker's result is never read.
//!
//! The pipeline instantiates this guard twice: once around the whole
//! compile+assert attempt (coarse, tens of seconds) and once around each
//! scripted step (fine-grained, seconds).

use std::time::Duration;
use tokio::task::JoinError;
use tracing::warn;

/// Result of racing an operation against a timer.
#[derive(Debug)]
pub enum GuardOutcome<T> {
    /// The operation finished first. Learner-level faults travel inside `T`
    /// (typically a `Result`); this variant only means the worker returned.
    Completed(T),
    /// The worker panicked; the payload message is preserved.
    Panicked(String),
    /// The timer fired first. The worker was abandoned, not terminated.
    TimedOut,
}

impl<T> GuardOutcome<T> {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, GuardOutcome::TimedOut)
    }
}

/// Run `op` on a blocking worker, racing it against `limit`.
///
/// `spawn_blocking` tasks cannot be aborted mid-execution, which is exactly
/// the execution model required here: on timeout the `JoinHandle` is dropped
/// and the worker keeps running detached.
pub async fn race_blocking<T, F>(op: F, limit: Duration) -> GuardOutcome<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(op);

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(value)) => GuardOutcome::Completed(value),
        Ok(Err(join_error)) => GuardOutcome::Panicked(panic_message(join_error)),
        Err(_elapsed) => {
            warn!(
                limit_ms = limit.as_millis() as u64,
                "operation exceeded its time bound; abandoning worker"
            );
            GuardOutcome::TimedOut
        }
    }
}

fn panic_message(join_error: JoinError) -> String {
    if join_error.is_panic() {
        let payload = join_error.into_panic();
        if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "worker panicked".to_string()
        }
    } else {
        "worker vanished before completing".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_completes_within_limit() {
        let outcome = race_blocking(|| 21 * 2, Duration::from_secs(5)).await;
        match outcome {
            GuardOutcome::Completed(v) => assert_eq!(v, 42),
            other => panic!("expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_times_out_near_limit_not_at_operation_duration() {
        let started = Instant::now();
        let outcome = race_blocking(
            || {
                std::thread::sleep(Duration::from_secs(2));
                0
            },
            Duration::from_millis(50),
        )
        .await;

        assert!(outcome.is_timed_out());
        // Returned at ~the limit, not after the 2s the worker needs.
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let outcome: GuardOutcome<()> =
            race_blocking(|| panic!("boom"), Duration::from_secs(5)).await;
        match outcome {
            GuardOutcome::Panicked(msg) => assert!(msg.contains("boom")),
            other => panic!("expected Panicked, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fault_travels_inside_completed() {
        let outcome = race_blocking(
            || -> Result<i32, String> { Err("division by zero".into()) },
            Duration::from_secs(5),
        )
        .await;
        match outcome {
            GuardOutcome::Completed(Err(msg)) => assert_eq!(msg, "division by zero"),
            other => panic!("expected Completed(Err), got {:?}", other),
        }
    }
}
