//! Retry classification and backoff for dispatch attempts.
//!
//! The decision logic here is pure. Waiting is delegated to a [`Sleeper`]
//! so the attempt loop can run against virtual time in tests.

use async_trait::async_trait;
use std::time::Duration;

/// Backoff unit; attempt `n` waits `(n + 1)` units before the next try.
const BACKOFF_STEP: Duration = Duration::from_millis(750);

/// Status the workflow dispatch API returns on success.
pub const SUCCESS_STATUS: u16 = 204;

const TOO_MANY_REQUESTS: u16 = 429;
const FIRST_SERVER_ERROR: u16 = 500;

/// How the attempt loop should treat a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptVerdict {
    /// The workflow was dispatched.
    Success,
    /// Rate limited or server error; worth another try.
    Transient,
    /// Any other status. Retrying will not help.
    Terminal,
}

impl AttemptVerdict {
    /// Classifies an HTTP status.
    #[must_use]
    pub fn classify(status: u16) -> Self {
        match status {
            SUCCESS_STATUS => Self::Success,
            TOO_MANY_REQUESTS => Self::Transient,
            s if s >= FIRST_SERVER_ERROR => Self::Transient,
            _ => Self::Terminal,
        }
    }
}

/// Delay before the attempt following `attempt_index`.
///
/// Linear: 750ms after attempt 0, 1500ms after attempt 1, and so on.
#[must_use]
pub fn backoff_for_attempt(attempt_index: u32) -> Duration {
    BACKOFF_STEP.saturating_mul(attempt_index.saturating_add(1))
}

/// The observed result of one HTTP call. Lives only for the duration of a
/// single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchAttempt {
    /// Zero-based.
    pub attempt_index: u32,
    pub status: u16,
    pub body: String,
}

impl DispatchAttempt {
    #[must_use]
    pub fn verdict(&self) -> AttemptVerdict {
        AttemptVerdict::classify(self.status)
    }

    /// Returns the backoff to apply if this attempt should be retried
    /// within a budget of `max_retries`, or `None` if the loop must stop.
    #[must_use]
    pub fn retry_after(&self, max_retries: u32) -> Option<Duration> {
        (self.verdict() == AttemptVerdict::Transient && self.attempt_index < max_retries)
            .then(|| backoff_for_attempt(self.attempt_index))
    }
}

/// Suspends the current task between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Waits for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(attempt_index: u32, status: u16) -> DispatchAttempt {
        DispatchAttempt {
            attempt_index,
            status,
            body: String::new(),
        }
    }

    #[test]
    fn classifies_statuses() {
        assert_eq!(AttemptVerdict::classify(204), AttemptVerdict::Success);
        assert_eq!(AttemptVerdict::classify(429), AttemptVerdict::Transient);
        assert_eq!(AttemptVerdict::classify(500), AttemptVerdict::Transient);
        assert_eq!(AttemptVerdict::classify(503), AttemptVerdict::Transient);
        assert_eq!(AttemptVerdict::classify(599), AttemptVerdict::Transient);
        assert_eq!(AttemptVerdict::classify(200), AttemptVerdict::Terminal);
        assert_eq!(AttemptVerdict::classify(401), AttemptVerdict::Terminal);
        assert_eq!(AttemptVerdict::classify(404), AttemptVerdict::Terminal);
        assert_eq!(AttemptVerdict::classify(422), AttemptVerdict::Terminal);
    }

    #[test]
    fn backoff_is_linear() {
        assert_eq!(backoff_for_attempt(0), Duration::from_millis(750));
        assert_eq!(backoff_for_attempt(1), Duration::from_millis(1500));
        assert_eq!(backoff_for_attempt(2), Duration::from_millis(2250));
    }

    #[test]
    fn transient_attempt_retries_while_budget_remains() {
        assert_eq!(
            attempt(0, 500).retry_after(2),
            Some(Duration::from_millis(750))
        );
        assert_eq!(
            attempt(1, 429).retry_after(2),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(attempt(2, 500).retry_after(2), None);
    }

    #[test]
    fn terminal_attempt_never_retries() {
        assert_eq!(attempt(0, 404).retry_after(5), None);
    }

    #[test]
    fn zero_budget_never_retries() {
        assert_eq!(attempt(0, 503).retry_after(0), None);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_sleeper_advances_virtual_time() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(750)).await;
        assert!(start.elapsed() >= Duration::from_millis(750));
    }
}
