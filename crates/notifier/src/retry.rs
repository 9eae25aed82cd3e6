//! Retry policy for notification delivery.

use std::time::Duration;

use homework_common::config::EXCEPTION_TIME_TO_SLEEP;

/// Fixed-delay retry policy.
///
/// `max_attempts = None` keeps retrying until delivery succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait between two attempts.
    pub delay: Duration,

    /// Total attempts allowed, including the first.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry forever with the given delay.
    pub fn unlimited(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Whether another attempt may follow `attempts` failed ones.
    pub fn should_retry(&self, attempts: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts < max,
            None => true,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unlimited(Duration::from_secs(EXCEPTION_TIME_TO_SLEEP))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_retries_forever_every_30s() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay, Duration::from_secs(30));
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(u32::MAX));
    }

    #[test]
    fn test_bounded_policy_stops_at_ceiling() {
        let policy = RetryPolicy::default().with_max_attempts(Some(3));
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }
}
