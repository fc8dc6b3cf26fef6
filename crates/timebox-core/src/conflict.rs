//! Conflict detection with buffer enforcement.
//!
//! Every existing activity is surrounded by a protected zone of
//! `buffer_minutes` on each side. A candidate conflicts with an activity when
//! it intersects that zone; touching the zone edge is allowed.

use serde::{Deserialize, Serialize};

use crate::activity::ActivitySlot;

/// What the caller should do about a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictAction {
    /// A fixed activity is in the way: the candidate has to move.
    FindAlternatives,
    /// Only flexible activities are in the way: they may be shifted instead.
    ReshuffleFlexible,
}

impl ConflictAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FindAlternatives => "FIND_ALTERNATIVES",
            Self::ReshuffleFlexible => "RESHUFFLE_FLEXIBLE",
        }
    }
}

/// Outcome of checking one candidate against a day's activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResult {
    pub has_conflict: bool,
    pub has_fixed_conflict: bool,
    pub conflicts: Vec<ActivitySlot>,
    pub action: ConflictAction,
}

impl ConflictResult {
    fn from_conflicts(conflicts: Vec<ActivitySlot>) -> Self {
        let has_fixed_conflict = conflicts.iter().any(|c| c.is_fixed);
        Self {
            has_conflict: !conflicts.is_empty(),
            has_fixed_conflict,
            conflicts,
            action: if has_fixed_conflict {
                ConflictAction::FindAlternatives
            } else {
                ConflictAction::ReshuffleFlexible
            },
        }
    }
}

/// Check `candidate` against `existing` under the given buffer.
///
/// Conflicts are returned in the order they appear in `existing`.
pub fn check_conflicts(
    candidate: &ActivitySlot,
    existing: &[ActivitySlot],
    buffer_minutes: u32,
) -> ConflictResult {
    let conflicts: Vec<ActivitySlot> = existing
        .iter()
        .filter(|ext| {
            let (zone_start, zone_end) = ext.protected_zone(buffer_minutes);
            candidate.overlaps(zone_start, zone_end)
        })
        .cloned()
        .collect();

    tracing::trace!(
        candidate = %candidate.title,
        checked = existing.len(),
        conflicts = conflicts.len(),
        "conflict check"
    );

    ConflictResult::from_conflicts(conflicts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 16, h, m, 0).unwrap()
    }

    fn slot(title: &str, start: DateTime<Utc>, end: DateTime<Utc>, fixed: bool) -> ActivitySlot {
        ActivitySlot::try_new(title, start, end).unwrap().with_fixed(fixed)
    }

    #[test]
    fn empty_schedule_never_conflicts() {
        let candidate = slot("Deep Work", at(9, 0), at(10, 0), false);
        let result = check_conflicts(&candidate, &[], 15);
        assert!(!result.has_conflict);
        assert!(!result.has_fixed_conflict);
        assert!(result.conflicts.is_empty());
        assert_eq!(result.action, ConflictAction::ReshuffleFlexible);
    }

    #[test]
    fn starting_exactly_at_buffer_edge_is_allowed() {
        let existing = vec![slot("Meeting", at(9, 0), at(10, 0), true)];
        let candidate = slot("Deep Work", at(10, 15), at(11, 15), false);
        assert!(!check_conflicts(&candidate, &existing, 15).has_conflict);
    }

    #[test]
    fn one_minute_inside_buffer_conflicts() {
        let existing = vec![slot("Meeting", at(9, 0), at(10, 0), true)];
        let candidate = slot("Deep Work", at(10, 14), at(11, 14), false);
        let result = check_conflicts(&candidate, &existing, 15);
        assert!(result.has_conflict);
        assert_eq!(result.conflicts.len(), 1);
    }

    #[test]
    fn ending_exactly_at_leading_buffer_edge_is_allowed() {
        let existing = vec![slot("Meeting", at(10, 0), at(11, 0), true)];
        let candidate = slot("Prep", at(9, 0), at(9, 45), false);
        assert!(!check_conflicts(&candidate, &existing, 15).has_conflict);
    }

    #[test]
    fn leading_buffer_intrusion_conflicts() {
        let existing = vec![slot("Meeting", at(10, 0), at(11, 0), true)];
        let candidate = slot("Prep", at(9, 50), at(10, 5), false);
        assert!(check_conflicts(&candidate, &existing, 15).has_conflict);
    }

    #[test]
    fn fixed_overlap_requests_alternatives() {
        let existing = vec![slot("Meeting", at(9, 0), at(10, 0), true)];
        let candidate = slot("Deep Work", at(9, 30), at(10, 30), false);
        let result = check_conflicts(&candidate, &existing, 15);
        assert!(result.has_conflict);
        assert!(result.has_fixed_conflict);
        assert_eq!(result.action, ConflictAction::FindAlternatives);
    }

    #[test]
    fn flexible_overlap_requests_reshuffle() {
        let existing = vec![slot("Flexible Task", at(9, 0), at(10, 0), false)];
        let candidate = slot("New Task", at(9, 30), at(10, 30), false);
        let result = check_conflicts(&candidate, &existing, 15);
        assert!(result.has_conflict);
        assert!(!result.has_fixed_conflict);
        assert_eq!(result.action, ConflictAction::ReshuffleFlexible);
    }

    #[test]
    fn any_fixed_conflict_wins_over_flexible_ones() {
        let existing = vec![
            slot("Flexible", at(9, 0), at(9, 30), false),
            slot("Fixed", at(10, 0), at(10, 30), true),
            slot("Far away", at(15, 0), at(16, 0), true),
        ];
        let candidate = slot("Long block", at(9, 15), at(10, 15), false);
        let result = check_conflicts(&candidate, &existing, 0);
        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(result.conflicts[0].title, "Flexible");
        assert_eq!(result.conflicts[1].title, "Fixed");
        assert_eq!(result.action, ConflictAction::FindAlternatives);
    }

    #[test]
    fn zero_buffer_allows_back_to_back() {
        let existing = vec![slot("Meeting", at(9, 0), at(10, 0), true)];
        let candidate = slot("Next", at(10, 0), at(11, 0), false);
        assert!(!check_conflicts(&candidate, &existing, 0).has_conflict);
    }

    #[test]
    fn action_serializes_as_wire_tag() {
        let json = serde_json::to_string(&ConflictAction::FindAlternatives).unwrap();
        assert_eq!(json, "\"FIND_ALTERNATIVES\"");
        assert_eq!(ConflictAction::ReshuffleFlexible.as_str(), "RESHUFFLE_FLEXIBLE");
    }
}
