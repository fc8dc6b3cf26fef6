//! Persistence seams and on-disk configuration.
//!
//! Activity records live behind [`ActivityStore`]; the core ships only the
//! in-memory [`MemoryStore`]. Configuration is a TOML file under
//! [`data_dir`].

mod config;
pub mod memory;

pub use config::{Config, PolicyConfig, ThrottleConfig, MAX_THROTTLE_WINDOW_SECONDS};
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::activity::{ActivityCategory, ActivitySlot};
use crate::day::DayWindow;
use crate::error::{Result, ValidationError};

/// Lifecycle status of a stored activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    #[default]
    Planned,
    PendingConfirmation,
    Completed,
}

/// A persisted activity owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredActivity {
    pub id: String,
    pub owner: String,
    #[serde(flatten)]
    pub slot: ActivitySlot,
    pub status: ActivityStatus,
    pub ai_reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to persist a new activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    #[serde(flatten)]
    pub slot: ActivitySlot,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub ai_reasoning: Option<String>,
}

impl From<ActivitySlot> for NewActivity {
    fn from(slot: ActivitySlot) -> Self {
        Self {
            slot,
            status: ActivityStatus::Planned,
            ai_reasoning: None,
        }
    }
}

/// Partial update of a stored activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub is_fixed: Option<bool>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub priority: Option<u8>,
    pub category: Option<ActivityCategory>,
    pub status: Option<ActivityStatus>,
}

impl ActivityPatch {
    /// Slot that results from applying this patch to `base`.
    ///
    /// # Errors
    /// Returns an error if the patched slot has an inverted time range or an
    /// out-of-range priority.
    pub fn apply_to(&self, base: &ActivitySlot) -> Result<ActivitySlot, ValidationError> {
        let patched = ActivitySlot {
            title: self.title.clone().unwrap_or_else(|| base.title.clone()),
            start_time: self.start_time.unwrap_or(base.start_time),
            end_time: self.end_time.unwrap_or(base.end_time),
            is_fixed: self.is_fixed.unwrap_or(base.is_fixed),
            category: self.category.unwrap_or(base.category),
            priority: self.priority.unwrap_or(base.priority),
        };
        patched.validate()?;
        Ok(patched)
    }
}

/// Record store for activities, keyed by owner identity.
///
/// Implementations must scope every query to `owner`. The day query returns
/// every activity intersecting `day`, ordered by start time.
pub trait ActivityStore: Send + Sync {
    fn activities_on(&self, owner: &str, day: &DayWindow) -> Result<Vec<StoredActivity>>;

    fn get(&self, owner: &str, id: &str) -> Result<Option<StoredActivity>>;

    fn insert(&self, owner: &str, activity: NewActivity) -> Result<StoredActivity>;

    /// Returns `None` when no such activity exists for `owner`.
    fn update(&self, owner: &str, id: &str, patch: &ActivityPatch)
        -> Result<Option<StoredActivity>>;

    /// Returns whether a record was removed.
    fn delete(&self, owner: &str, id: &str) -> Result<bool>;
}

/// Returns `~/.config/timebox[-dev]/` based on TIMEBOX_ENV.
///
/// Set TIMEBOX_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TIMEBOX_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timebox-dev")
    } else {
        base_dir.join("timebox")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
