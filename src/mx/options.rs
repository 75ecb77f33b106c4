use std::time::Duration;

/// Bounds applied to every MX query so an unreachable resolver cannot stall
/// the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxOptions {
    /// Per-attempt query timeout.
    pub timeout: Duration,
    pub attempts: usize,
}

impl Default for MxOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            attempts: 1,
        }
    }
}

impl MxOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Worst-case time a lookup may take.
    pub fn budget(&self) -> Duration {
        self.timeout * self.attempts.max(1) as u32
    }
}
