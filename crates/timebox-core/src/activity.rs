//! Activity slot types and utilities.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Lowest priority value (most disposable).
pub const MIN_PRIORITY: u8 = 1;
/// Highest priority value.
pub const MAX_PRIORITY: u8 = 5;
/// Priority assigned when the caller does not give one.
pub const DEFAULT_PRIORITY: u8 = 3;

/// Category of an activity.
///
/// Only used to split the day into work and rest for burnout purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    DeepWork,
    #[default]
    Admin,
    Health,
    Social,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepWork => "deep_work",
            Self::Admin => "admin",
            Self::Health => "health",
            Self::Social => "social",
        }
    }

    /// `deep_work` and `admin` count as work; everything else is rest.
    pub fn is_work(&self) -> bool {
        matches!(self, Self::DeepWork | Self::Admin)
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deep_work" => Ok(Self::DeepWork),
            "admin" => Ok(Self::Admin),
            "health" => Ok(Self::Health),
            "social" => Ok(Self::Social),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{other}'"),
            }),
        }
    }
}

/// A single time-boxed activity on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySlot {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default)]
    pub category: ActivityCategory,
    #[serde(default = "default_priority")]
    pub priority: u8, // 1-5
}

fn default_priority() -> u8 {
    DEFAULT_PRIORITY
}

impl ActivitySlot {
    /// Create a flexible `admin` activity with default priority.
    ///
    /// # Errors
    /// Returns an error if `end_time <= start_time`
    pub fn try_new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if end_time <= start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            title: title.into(),
            start_time,
            end_time,
            is_fixed: false,
            category: ActivityCategory::default(),
            priority: DEFAULT_PRIORITY,
        })
    }

    /// Check the invariants that deserialized slots may violate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end_time <= self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(ValidationError::InvalidPriority(self.priority));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Get duration in whole minutes (truncated)
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Duration rounded to the nearest minute, half up. Used when asking for
    /// alternative slots of the same length.
    pub fn rounded_minutes(&self) -> u32 {
        let seconds = self.duration().num_seconds().max(0);
        u32::try_from((seconds + 30) / 60).unwrap_or(u32::MAX)
    }

    /// Interval widened by `buffer_minutes` on both sides.
    pub fn protected_zone(&self, buffer_minutes: u32) -> (DateTime<Utc>, DateTime<Utc>) {
        let buffer = Duration::minutes(i64::from(buffer_minutes));
        (self.start_time - buffer, self.end_time + buffer)
    }

    /// Strict overlap check: touching intervals do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }

    pub fn is_work(&self) -> bool {
        self.category.is_work()
    }

    pub fn with_fixed(mut self, is_fixed: bool) -> Self {
        self.is_fixed = is_fixed;
        self
    }

    pub fn with_category(mut self, category: ActivityCategory) -> Self {
        self.category = category;
        self
    }

    /// Set priority, clamped into 1..=5
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
        self
    }
}

/// Sort a copy of `activities` by start time, leaving the input untouched.
pub(crate) fn sorted_by_start(activities: &[ActivitySlot]) -> Vec<&ActivitySlot> {
    let mut sorted: Vec<&ActivitySlot> = activities.iter().collect();
    sorted.sort_by_key(|a| a.start_time);
    sorted
}
