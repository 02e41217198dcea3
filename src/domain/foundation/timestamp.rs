//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 timestamp string.
    pub fn parse_rfc3339(s: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)))
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of days.
    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }

    /// Creates a new timestamp by adding calendar months.
    ///
    /// Month-rollover semantics, not fixed 30-day windows: the day of
    /// month is clamped to the target month's length, so Jan 31 plus one
    /// month lands on Feb 28 (or Feb 29 in a leap year).
    pub fn plus_calendar_months(&self, months: u32) -> Self {
        // checked_add_months only fails past year 262143; the clamp keeps
        // any representable date valid.
        Self(
            self.0
                .checked_add_months(Months::new(months))
                .unwrap_or(self.0),
        )
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse_rfc3339(s).unwrap()
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let t = Timestamp::now();
        let after = Utc::now();

        assert!(t.as_datetime() >= &before);
        assert!(t.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_is_before_and_after_work() {
        let t1 = ts("2024-01-15T10:00:00Z");
        let t2 = ts("2024-01-15T10:00:01Z");

        assert!(t1.is_before(&t2));
        assert!(t2.is_after(&t1));
        assert!(!t2.is_before(&t1));
    }

    #[test]
    fn plus_days_and_minus_days_are_inverse() {
        let t = ts("2024-03-10T08:30:00Z");
        assert_eq!(t.plus_days(60).minus_days(60), t);
    }

    #[test]
    fn plus_calendar_months_advances_one_month() {
        let t = ts("2024-01-15T12:00:00Z");
        assert_eq!(t.plus_calendar_months(1), ts("2024-02-15T12:00:00Z"));
    }

    #[test]
    fn plus_calendar_months_clamps_end_of_month() {
        // Jan 31 + 1 month lands on Feb 29 in a leap year
        let t = ts("2024-01-31T09:00:00Z");
        assert_eq!(t.plus_calendar_months(1), ts("2024-02-29T09:00:00Z"));

        // ...and Feb 28 otherwise
        let t = ts("2023-01-31T09:00:00Z");
        assert_eq!(t.plus_calendar_months(1), ts("2023-02-28T09:00:00Z"));
    }

    #[test]
    fn plus_calendar_months_twelve_advances_one_year() {
        let t = ts("2024-06-05T00:00:00Z");
        assert_eq!(t.plus_calendar_months(12), ts("2025-06-05T00:00:00Z"));
    }

    #[test]
    fn timestamp_serializes_to_json() {
        let t = ts("2024-01-15T10:30:00Z");
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("2024-01-15"));
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let t: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(t.as_datetime().year(), 2024);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn adding_months_never_moves_backwards(
                secs in 0i64..4_000_000_000,
                months in 0u32..240,
            ) {
                use chrono::TimeZone;
                let t = Timestamp::from_datetime(Utc.timestamp_opt(secs, 0).unwrap());
                prop_assert!(!t.plus_calendar_months(months).is_before(&t));
            }

            #[test]
            fn adding_months_preserves_time_of_day(
                secs in 0i64..4_000_000_000,
                months in 0u32..240,
            ) {
                use chrono::{TimeZone, Timelike};
                let t = Timestamp::from_datetime(Utc.timestamp_opt(secs, 0).unwrap());
                let shifted = t.plus_calendar_months(months);
                prop_assert_eq!(
                    shifted.as_datetime().num_seconds_from_midnight(),
                    t.as_datetime().num_seconds_from_midnight()
                );
            }
        }
    }
}
