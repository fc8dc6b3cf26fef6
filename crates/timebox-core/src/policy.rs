//! Per-user scheduling policy.
//!
//! These are the configuration attributes carried by an authenticated
//! principal. The reasoning modules only ever read `buffer_minutes`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_BUFFER_MINUTES: u32 = 5;
pub const MAX_BUFFER_MINUTES: u32 = 45;

/// Buffer, bedtime and timezone for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPolicy {
    #[serde(default = "default_buffer_minutes")]
    pub buffer_minutes: u32,
    /// HH:MM
    #[serde(default = "default_sleep_start")]
    pub sleep_start: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Partial settings change; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdate {
    pub buffer_minutes: Option<u32>,
    pub sleep_start: Option<String>,
    pub timezone: Option<String>,
}

pub(crate) fn default_buffer_minutes() -> u32 {
    15
}
pub(crate) fn default_sleep_start() -> String {
    "22:00".into()
}
pub(crate) fn default_timezone() -> String {
    "UTC".into()
}

impl Default for UserPolicy {
    fn default() -> Self {
        Self {
            buffer_minutes: default_buffer_minutes(),
            sleep_start: default_sleep_start(),
            timezone: default_timezone(),
        }
    }
}

impl UserPolicy {
    /// Check the buffer range and bedtime format.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_BUFFER_MINUTES..=MAX_BUFFER_MINUTES).contains(&self.buffer_minutes) {
            return Err(ValidationError::InvalidValue {
                field: "bufferMinutes".into(),
                message: format!(
                    "{} is outside {MIN_BUFFER_MINUTES}..={MAX_BUFFER_MINUTES}",
                    self.buffer_minutes
                ),
            });
        }
        self.sleep_start_time()?;
        if self.timezone.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "timezone".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Parsed bedtime.
    pub fn sleep_start_time(&self) -> Result<NaiveTime, ValidationError> {
        parse_hh_mm(&self.sleep_start)
    }

    /// Apply `update` and re-validate. On error `self` is left unchanged.
    pub fn update(&mut self, update: PolicyUpdate) -> Result<(), ValidationError> {
        let mut next = self.clone();
        if let Some(buffer) = update.buffer_minutes {
            next.buffer_minutes = buffer;
        }
        if let Some(sleep_start) = update.sleep_start {
            next.sleep_start = sleep_start;
        }
        if let Some(timezone) = update.timezone {
            next.timezone = timezone;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }
}

/// Parse `H:MM` / `HH:MM` with hours 0-23.
fn parse_hh_mm(value: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        field: "sleepStart".into(),
        message: format!("'{value}' is not HH:MM"),
    };
    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let h: u32 = hours.parse().map_err(|_| invalid())?;
    let m: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid)
}
