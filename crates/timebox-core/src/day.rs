//! Day window bounds supplied to the slot finder and triage.
//!
//! The core never decides where a calendar day begins; callers build a
//! [`DayWindow`] from whatever boundary they use.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Time window bounding a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// # Errors
    /// Returns an error if `end <= start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidDayWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Calendar day in UTC: `00:00:00.000` through `23:59:59.999`.
    pub fn utc_day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1) - Duration::milliseconds(1),
        }
    }

    /// Parse a `YYYY-MM-DD` date into its UTC day.
    pub fn parse_utc_day(date: &str) -> Result<Self, ValidationError> {
        let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
            ValidationError::InvalidValue {
                field: "date".into(),
                message: format!("'{date}' is not YYYY-MM-DD: {e}"),
            }
        })?;
        Ok(Self::utc_day(parsed))
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Calendar date (UTC) of the window start.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Calendar date (UTC) following the window start.
    pub fn next_date(&self) -> NaiveDate {
        (self.start + Duration::days(1)).date_naive()
    }

    /// Whether `[start, end)` intersects this window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn utc_day_bounds() {
        let day = DayWindow::utc_day(NaiveDate::from_ymd_opt(2026, 2, 16).unwrap());
        assert_eq!(day.start, Utc.with_ymd_and_hms(2026, 2, 16, 0, 0, 0).unwrap());
        assert_eq!(day.end.to_rfc3339(), "2026-02-16T23:59:59.999+00:00");
        assert_eq!(day.duration_minutes(), 1439);
        assert_eq!(day.next_date(), NaiveDate::from_ymd_opt(2026, 2, 17).unwrap());
    }

    #[test]
    fn new_rejects_empty_window() {
        let t = Utc.with_ymd_and_hms(2026, 2, 16, 0, 0, 0).unwrap();
        assert!(DayWindow::new(t, t).is_err());
        assert!(DayWindow::new(t, t - Duration::minutes(1)).is_err());
    }

    #[test]
    fn parse_utc_day_rejects_garbage() {
        assert!(DayWindow::parse_utc_day("2026-02-16").is_ok());
        assert!(DayWindow::parse_utc_day("16/02/2026").is_err());
    }

    #[test]
    fn next_date_rolls_over_month_end() {
        let day = DayWindow::parse_utc_day("2026-02-28").unwrap();
        assert_eq!(day.next_date().to_string(), "2026-03-01");
    }
}
