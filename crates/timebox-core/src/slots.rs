//! Alternative slot search between existing activities.
//!
//! Looks at the gap before the first activity, the gaps between consecutive
//! activities and the gap after the last one, each shrunk by the buffer on
//! the activity side(s). Every gap that can host the requested duration
//! yields exactly one slot anchored at the gap's start.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{sorted_by_start, ActivitySlot};
use crate::day::DayWindow;

/// A free slot offered as an alternative for a conflicting activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Always the requested duration, never the gap width
    pub duration_minutes: u32,
}

/// Open region between protected zones.
#[derive(Debug, Clone, Copy)]
struct Gap {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Gap {
    fn can_fit(&self, required: Duration) -> bool {
        // Zero and negative widths never qualify.
        self.end > self.start && self.end - self.start >= required
    }
}

/// Finder for alternative slots in a day
pub struct AlternativeSlotFinder {
    /// Minimum separation kept from existing activities (in minutes)
    buffer_minutes: u32,
}

impl AlternativeSlotFinder {
    /// Create a finder that keeps `buffer_minutes` away from every activity
    pub fn new(buffer_minutes: u32) -> Self {
        Self { buffer_minutes }
    }

    /// Find slots of `required_minutes` within `day`
    ///
    /// # Returns
    /// At most one slot per gap, in chronological order. A request for zero
    /// minutes yields nothing.
    pub fn find(
        &self,
        existing: &[ActivitySlot],
        required_minutes: u32,
        day: &DayWindow,
    ) -> Vec<AlternativeSlot> {
        if required_minutes == 0 {
            return Vec::new();
        }
        let required = Duration::minutes(i64::from(required_minutes));

        let slots: Vec<AlternativeSlot> = self
            .gaps(existing, day)
            .into_iter()
            .filter(|gap| gap.can_fit(required))
            .map(|gap| AlternativeSlot {
                start: gap.start,
                end: gap.start + required,
                duration_minutes: required_minutes,
            })
            .collect();

        tracing::trace!(
            existing = existing.len(),
            required_minutes,
            found = slots.len(),
            "alternative slot search"
        );
        slots
    }

    fn gaps(&self, existing: &[ActivitySlot], day: &DayWindow) -> Vec<Gap> {
        let sorted = sorted_by_start(existing);
        let buffer = Duration::minutes(i64::from(self.buffer_minutes));

        let (first, last) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return vec![Gap {
                    start: day.start,
                    end: day.end,
                }]
            }
        };

        let mut gaps = Vec::with_capacity(sorted.len() + 1);
        gaps.push(Gap {
            start: day.start,
            end: first.start_time - buffer,
        });
        for pair in sorted.windows(2) {
            gaps.push(Gap {
                start: pair[0].end_time + buffer,
                end: pair[1].start_time - buffer,
            });
        }
        gaps.push(Gap {
            start: last.end_time + buffer,
            end: day.end,
        });
        gaps
    }
}

/// Convenience function mirroring [`AlternativeSlotFinder::find`]
pub fn find_alternative_slots(
    existing: &[ActivitySlot],
    required_minutes: u32,
    buffer_minutes: u32,
    day: &DayWindow,
) -> Vec<AlternativeSlot> {
    AlternativeSlotFinder::new(buffer_minutes).find(existing, required_minutes, day)
}
