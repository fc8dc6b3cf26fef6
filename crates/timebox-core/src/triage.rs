//! Day capacity triage.
//!
//! Compares the minutes a day's activities need (including the buffers
//! between them) with the minutes the day window offers, and on overload
//! ranks flexible low-priority activities that could move to the next day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::activity::{sorted_by_start, ActivitySlot};
use crate::day::DayWindow;

/// Activities at or below this priority may be suggested for moving
pub const MOVABLE_PRIORITY_CEILING: u8 = 3;

/// An activity suggested for de-scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMove {
    pub title: String,
    pub priority: u8,
    pub suggested_date: NaiveDate,
}

/// Capacity verdict for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResult {
    pub is_overload: bool,
    pub total_duration_minutes: i64,
    pub available_minutes: i64,
    /// Negative when overloaded
    pub remaining_minutes: i64,
    pub suggestion: Option<String>,
    pub suggested_moves: Vec<SuggestedMove>,
}

/// Analyze whether `activities` fit into `day` with `buffer_minutes` between
/// consecutive items.
pub fn analyze_capacity(
    activities: &[ActivitySlot],
    buffer_minutes: u32,
    day: &DayWindow,
) -> TriageResult {
    let buffer = i64::from(buffer_minutes);
    let available_minutes = day.duration_minutes();
    let sorted = sorted_by_start(activities);

    let busy: i64 = sorted.iter().map(|a| a.duration_minutes()).sum();
    let gaps = sorted.len().saturating_sub(1) as i64;
    let total_duration_minutes = busy + buffer * gaps;

    let remaining_minutes = available_minutes - total_duration_minutes;
    let is_overload = remaining_minutes < 0;

    let mut suggestion = None;
    let mut suggested_moves = Vec::new();

    if is_overload {
        let overflow = remaining_minutes.abs();
        let suggested_date = day.next_date();

        let mut movable: Vec<&ActivitySlot> = sorted
            .iter()
            .copied()
            .filter(|a| !a.is_fixed && a.priority <= MOVABLE_PRIORITY_CEILING)
            .collect();
        // Stable sort keeps chronological order among equal priorities.
        movable.sort_by_key(|a| a.priority);

        let mut remaining_overflow = overflow;
        for act in movable {
            suggested_moves.push(SuggestedMove {
                title: act.title.clone(),
                priority: act.priority,
                suggested_date,
            });
            remaining_overflow -= act.duration_minutes() + buffer;
            if remaining_overflow <= 0 {
                break;
            }
        }

        suggestion = Some(format!(
            "Your schedule for today is over capacity (overload {overflow} minutes). \
             Consider moving low-priority tasks to tomorrow."
        ));

        tracing::debug!(
            overflow,
            moves = suggested_moves.len(),
            "day over capacity"
        );
    }

    TriageResult {
        is_overload,
        total_duration_minutes,
        available_minutes,
        remaining_minutes,
        suggestion,
        suggested_moves,
    }
}
