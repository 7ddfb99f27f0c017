//! Projection of an instant onto a civil calendar in a fixed offset.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};
use std::fmt;

/// Offset of Singapore time from UTC, in seconds.
///
/// Singapore has not observed daylight saving since 1982, so a fixed
/// offset is exact for every instant the window cares about.
pub const SINGAPORE_OFFSET_SECONDS: i32 = 8 * 60 * 60;

/// The fixed UTC+8 offset.
pub const SINGAPORE_OFFSET: FixedOffset = match FixedOffset::east_opt(SINGAPORE_OFFSET_SECONDS) {
    Some(offset) => offset,
    None => panic!("UTC+8 is a valid offset"),
};

/// Civil date and time fields of an instant as seen in a fixed offset.
///
/// Derived fresh for every evaluation and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalDateParts {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// 1-31.
    pub day: u32,
    /// 0-23.
    pub hour: u32,
    /// 0-59.
    pub minute: u32,
}

impl LocalDateParts {
    /// Decomposes `instant` into calendar fields at `offset`.
    #[must_use]
    pub fn from_instant(instant: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = instant.with_timezone(&offset);
        Self {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
        }
    }
}

impl fmt::Display for LocalDateParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn in_singapore(instant: DateTime<Utc>) -> LocalDateParts {
        LocalDateParts::from_instant(instant, SINGAPORE_OFFSET)
    }

    fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("valid UTC timestamp")
    }

    #[test]
    fn shifts_by_eight_hours() {
        let parts = in_singapore(utc(2026, 2, 3, 2, 15));
        assert_eq!(
            parts,
            LocalDateParts {
                year: 2026,
                month: 2,
                day: 3,
                hour: 10,
                minute: 15,
            }
        );
    }

    #[test]
    fn crosses_the_date_line() {
        let parts = in_singapore(utc(2026, 2, 2, 16, 0));
        assert_eq!((parts.month, parts.day, parts.hour), (2, 3, 0));
    }

    #[test]
    fn crosses_the_year_boundary() {
        let parts = in_singapore(utc(2025, 12, 31, 17, 30));
        assert_eq!(
            (parts.year, parts.month, parts.day, parts.hour),
            (2026, 1, 1, 1)
        );
    }

    #[test]
    fn custom_offset_is_respected() {
        let utc_offset = FixedOffset::east_opt(0).expect("valid offset");
        let parts = LocalDateParts::from_instant(utc(2026, 2, 3, 2, 15), utc_offset);
        assert_eq!(parts.hour, 2);
    }

    #[test]
    fn display_is_zero_padded() {
        let parts = in_singapore(utc(2026, 2, 3, 1, 5));
        assert_eq!(parts.to_string(), "2026-02-03 09:05");
    }
}
