//! The collection window policy.
//!
//! The window is a literal table: every day in February 2026 from the 3rd
//! to the 15th collects from 10:00 through 21:59 local time, and the 16th
//! collects from 10:00 through 12:59. Nothing else is inside the window.

use crate::parts::{LocalDateParts, SINGAPORE_OFFSET};
use chrono::{DateTime, FixedOffset, Utc};
use std::ops::RangeInclusive;

const WINDOW_YEAR: i32 = 2026;
const WINDOW_MONTH: u32 = 2;

/// Active hours for a run of days. Both ranges are inclusive; minutes
/// are ignored, so an hour bound covers the whole `HH:00`-`HH:59` span.
#[derive(Debug, Clone)]
struct DayRule {
    days: RangeInclusive<u32>,
    hours: RangeInclusive<u32>,
}

/// First matching rule wins. Days not covered are outside the window.
static COLLECTION_DAYS: [DayRule; 2] = [
    DayRule {
        days: 3..=15,
        hours: 10..=21,
    },
    DayRule {
        days: 16..=16,
        hours: 10..=12,
    },
];

/// Decides whether an instant falls inside the collection window.
///
/// The gate holds no state between calls; every evaluation projects the
/// instant into local calendar fields afresh.
#[derive(Debug, Clone, Copy)]
pub struct WindowGate {
    offset: FixedOffset,
}

impl WindowGate {
    /// Creates a gate that resolves instants in Singapore time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offset: SINGAPORE_OFFSET,
        }
    }

    /// Projects `now` into the gate's local calendar.
    #[must_use]
    pub fn local_parts(&self, now: DateTime<Utc>) -> LocalDateParts {
        LocalDateParts::from_instant(now, self.offset)
    }

    /// Returns true if `now` is inside the collection window.
    #[must_use]
    pub fn evaluate(&self, now: DateTime<Utc>) -> bool {
        Self::contains(&self.local_parts(now))
    }

    /// Applies the policy table to already-projected calendar fields.
    #[must_use]
    pub fn contains(parts: &LocalDateParts) -> bool {
        if parts.year != WINDOW_YEAR || parts.month != WINDOW_MONTH {
            return false;
        }

        COLLECTION_DAYS
            .iter()
            .find(|rule| rule.days.contains(&parts.day))
            .is_some_and(|rule| rule.hours.contains(&parts.hour))
    }
}

impl Default for WindowGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if `now` is inside the collection window, resolved in
/// Singapore time.
#[must_use]
pub fn is_within_collection_window(now: DateTime<Utc>) -> bool {
    WindowGate::new().evaluate(now)
}
