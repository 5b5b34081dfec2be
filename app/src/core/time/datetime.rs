use std::{
    fmt::Display,
    ops::{Add, Sub},
};

use chrono::{DurationRound as _, Utc};
use tokio::task_local;

use super::Duration;

task_local! {
    pub static FIXED_NOW: DateTime;
}

/// An instant in time, always held in UTC.
///
/// Values coming from the database or from clients carrying other offsets are
/// converted on construction, so comparisons and hour truncation never depend
/// on the server's local zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DateTime {
    delegate: chrono::DateTime<Utc>,
}

impl DateTime {
    fn new<T: chrono::TimeZone>(delegate: chrono::DateTime<T>) -> Self {
        Self {
            delegate: delegate.with_timezone(&Utc),
        }
    }

    pub fn now() -> Self {
        FIXED_NOW.try_with(|t| *t).unwrap_or_else(|_| Utc::now().into())
    }

    pub fn from_iso(iso8601: &str) -> anyhow::Result<Self> {
        Ok(chrono::DateTime::parse_from_rfc3339(iso8601)?.into())
    }

    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        chrono::DateTime::from_timestamp_millis(millis).map(Into::into)
    }

    pub fn to_iso_string(&self) -> String {
        self.delegate.to_rfc3339()
    }

    /// Start of the hour this instant falls into.
    pub fn truncate_to_hour(&self) -> Self {
        //rounding only fails for durations exceeding the representable range
        self.delegate
            .duration_trunc(chrono::TimeDelta::hours(1))
            .map(Into::into)
            .unwrap_or(*self)
    }

    pub fn format_hour_minute(&self) -> String {
        self.delegate.format("%H:%M").to_string()
    }

    pub fn elapsed_since(&self, since: Self) -> Duration {
        Duration::new(self.delegate - since.delegate)
    }

    /// `None` if the result leaves the representable range.
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        self.delegate.checked_sub_signed(duration.delegate).map(Into::into)
    }

    pub fn into_db(&self) -> chrono::DateTime<Utc> {
        self.delegate
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.delegate)
    }
}

impl Add<Duration> for DateTime {
    type Output = DateTime;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate + rhs.delegate)
    }
}

impl Sub<Duration> for DateTime {
    type Output = DateTime;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::new(self.delegate - rhs.delegate)
    }
}

impl<T: chrono::TimeZone> From<chrono::DateTime<T>> for DateTime {
    fn from(val: chrono::DateTime<T>) -> Self {
        DateTime::new(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_normalized_to_utc() {
        let with_offset = DateTime::from_iso("2025-03-10T10:15:00+02:00").unwrap();
        let utc = DateTime::from_iso("2025-03-10T08:15:00Z").unwrap();

        assert_eq!(with_offset, utc);
        assert_eq!(with_offset.to_iso_string(), "2025-03-10T08:15:00+00:00");
    }

    #[test]
    fn test_truncate_to_hour() {
        let dt = DateTime::from_iso("2025-03-10T09:45:12.345Z").unwrap();

        assert_eq!(dt.truncate_to_hour(), DateTime::from_iso("2025-03-10T09:00:00Z").unwrap());
    }

    #[test]
    fn test_truncate_to_hour_uses_utc_hour() {
        let dt = DateTime::from_iso("2025-03-10T09:45:00+05:30").unwrap();

        assert_eq!(dt.truncate_to_hour(), DateTime::from_iso("2025-03-10T04:00:00Z").unwrap());
        assert_eq!(dt.truncate_to_hour().format_hour_minute(), "04:00");
    }

    #[test]
    fn test_from_epoch_millis() {
        let dt = DateTime::from_epoch_millis(1_741_598_100_000).unwrap();

        assert_eq!(dt, DateTime::from_iso("2025-03-10T09:15:00Z").unwrap());
    }

    #[test]
    fn test_checked_sub() {
        let dt = DateTime::from_iso("2025-03-10T09:15:00Z").unwrap();

        assert_eq!(
            dt.checked_sub(Duration::hours(3)),
            Some(DateTime::from_iso("2025-03-10T06:15:00Z").unwrap())
        );
        assert_eq!(dt.checked_sub(Duration::hours(3_000_000_000)), None);
    }

    #[test]
    fn test_from_epoch_millis_out_of_range() {
        assert!(DateTime::from_epoch_millis(i64::MAX).is_none());
    }
}
