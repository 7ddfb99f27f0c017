//! Events delivered by the host scheduler.

use chrono::{DateTime, Utc};
use std::fmt;

/// What caused an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// A scheduler firing. Subject to the collection window.
    Scheduled,
    /// An operator-requested run. Bypasses the collection window.
    Manual,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// A single firing of the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// The instant the firing is for. The window is evaluated against this,
    /// not against the time the handler happens to run.
    pub scheduled_time: DateTime<Utc>,
    pub source: TriggerSource,
}

impl ScheduledEvent {
    /// Creates a scheduler firing for `scheduled_time`.
    #[must_use]
    pub fn scheduled(scheduled_time: DateTime<Utc>) -> Self {
        Self {
            scheduled_time,
            source: TriggerSource::Scheduled,
        }
    }

    /// Creates an operator-requested run for `scheduled_time`.
    #[must_use]
    pub fn manual(scheduled_time: DateTime<Utc>) -> Self {
        Self {
            scheduled_time,
            source: TriggerSource::Manual,
        }
    }
}
