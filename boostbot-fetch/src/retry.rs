//! Backoff policy for challenge warm-up retries.

use std::time::Duration;

/// Exponential backoff between warm-up attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Whether to double the delay after each attempt.
    pub exponential: bool,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
}

impl BackoffPolicy {
    /// Creates a policy with the given attempt budget.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_secs(1),
            exponential: true,
            max_delay: Duration::from_secs(60),
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Calculates the delay after the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential {
            let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
            self.base_delay.saturating_mul(factor)
        } else {
            self.base_delay
        };

        delay.min(self.max_delay)
    }

    /// Returns true if another attempt is allowed after `attempt` failures.
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
