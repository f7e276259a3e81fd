//! Engine configuration
//!
//! Timeout bounds for the two guard layers. The config is an explicit value
//! passed to the scheduler; there is no process-wide state to initialize.

use std::time::Duration;

/// Timeout bounds for one evaluation pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Outer bound around the whole compile+assert attempt (default: 60s)
    pub outer_timeout: Duration,
    /// Inner bound around one scripted step (default: 2s)
    pub step_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            outer_timeout: Duration::from_secs(60),
            step_timeout: Duration::from_secs(2),
        }
    }
}

impl EngineConfig {
    pub fn with_outer_timeout(mut self, outer_timeout: Duration) -> Self {
        self.outer_timeout = outer_timeout;
        self
    }

    pub fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }
}
