//! Continuous work streak (burnout) detection.
//!
//! Work-category activities separated by no more than the user's buffer plus
//! a small slack are merged into one streak. Any rest-category activity ends
//! the current streak. Streaks of three hours or more produce a warning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{sorted_by_start, ActivitySlot};

/// Streak length (minutes) at which a warning is raised
pub const MAX_CONTINUOUS_WORK_MINUTES: i64 = 180;

/// Extra minutes on top of the buffer still treated as continuous work
pub const MERGE_SLACK_MINUTES: i64 = 5;

/// A work streak long enough to warrant a break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutWarning {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub continuous_minutes: i64,
    pub suggestion: String,
}

/// How a streak came to an end; only changes the wording of the suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreakEnd {
    /// Next work block started too late to merge
    Gap,
    /// Rest activity or end of day
    Rest,
}

#[derive(Debug, Clone, Copy)]
struct Streak {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Streak {
    fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    fn warning(&self, ended_by: StreakEnd) -> Option<BurnoutWarning> {
        let continuous_minutes = self.minutes();
        if continuous_minutes < MAX_CONTINUOUS_WORK_MINUTES {
            return None;
        }
        let end = self.end.to_rfc3339();
        let suggestion = match ended_by {
            StreakEnd::Gap => {
                format!("Insert a \"Short Break\" or \"Stretch Break\" after {end}")
            }
            StreakEnd::Rest => format!("Insert a \"Short Break\" after {end}"),
        };
        Some(BurnoutWarning {
            start: self.start,
            end: self.end,
            continuous_minutes,
            suggestion,
        })
    }
}

/// Detect work streaks of three hours or more.
///
/// `buffer_minutes` widens the merge tolerance: two work blocks separated by
/// up to `buffer_minutes + 5` minutes still count as one streak.
pub fn detect_burnout(activities: &[ActivitySlot], buffer_minutes: u32) -> Vec<BurnoutWarning> {
    let tolerance = i64::from(buffer_minutes) + MERGE_SLACK_MINUTES;
    let mut warnings = Vec::new();
    let mut current: Option<Streak> = None;

    for act in sorted_by_start(activities) {
        if !act.is_work() {
            if let Some(streak) = current.take() {
                warnings.extend(streak.warning(StreakEnd::Rest));
            }
            continue;
        }

        current = Some(match current {
            None => Streak {
                start: act.start_time,
                end: act.end_time,
            },
            Some(streak) => {
                let gap = (act.start_time - streak.end).num_minutes();
                if gap <= tolerance {
                    Streak {
                        start: streak.start,
                        end: act.end_time,
                    }
                } else {
                    warnings.extend(streak.warning(StreakEnd::Gap));
                    Streak {
                        start: act.start_time,
                        end: act.end_time,
                    }
                }
            }
        });
    }

    if let Some(streak) = current {
        warnings.extend(streak.warning(StreakEnd::Rest));
    }

    tracing::trace!(
        activities = activities.len(),
        warnings = warnings.len(),
        "burnout scan"
    );
    warnings
}
