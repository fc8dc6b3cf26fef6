//! Per-user request throttling for the reasoning-service endpoints.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::ConfigError;
use crate::storage::ThrottleConfig;

/// Result of asking the throttle for permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

/// Injected request limiter. `now` is passed in so callers control time.
pub trait RequestThrottle: Send + Sync {
    fn check(&self, owner: &str, now: DateTime<Utc>) -> ThrottleDecision;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window counter per owner.
///
/// The first request (or the first one at or after the window's reset time)
/// opens a fresh window. Requests beyond `limit` inside a window are refused
/// until it resets.
#[derive(Debug)]
pub struct FixedWindowThrottle {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowThrottle {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the configured window is out of range.
    pub fn from_config(config: &ThrottleConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.limit, config.window()?))
    }
}

impl Default for FixedWindowThrottle {
    /// 10 requests per 60 seconds.
    fn default() -> Self {
        Self::new(10, Duration::seconds(60))
    }
}

impl RequestThrottle for FixedWindowThrottle {
    fn check(&self, owner: &str, now: DateTime<Utc>) -> ThrottleDecision {
        // A poisoned lock only means another request panicked mid-update;
        // the counters are still usable.
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let fresh = Window {
            count: 1,
            reset_at: now + self.window,
        };
        let window = match windows.get_mut(owner) {
            Some(window) if now < window.reset_at => {
                window.count = window.count.saturating_add(1);
                *window
            }
            _ => {
                windows.retain(|_, w| now < w.reset_at);
                windows.insert(owner.to_string(), fresh);
                fresh
            }
        };

        ThrottleDecision {
            allowed: window.count <= self.limit,
            remaining: self.limit.saturating_sub(window.count),
            reset_at: window.reset_at,
        }
    }
}
