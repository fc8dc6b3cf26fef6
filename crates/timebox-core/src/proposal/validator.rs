//! Batch validation of candidate activities before persistence.
//!
//! Candidates are checked one at a time against a snapshot of the persisted
//! day. Earlier candidates in the same batch are not added to the snapshot
//! for later ones. The first rejected candidate rejects the whole batch.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::activity::ActivitySlot;
use crate::conflict::{check_conflicts, ConflictResult};
use crate::day::DayWindow;
use crate::slots::{find_alternative_slots, AlternativeSlot};

/// Which conflicts make a candidate unacceptable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectOn {
    /// Only conflicts with fixed activities. Used for freshly generated
    /// proposals, where flexible clashes are left to the reasoning service.
    #[default]
    FixedConflict,
    /// Any conflict. Used when the user confirms a proposal for persistence.
    AnyConflict,
}

impl RejectOn {
    fn rejects(&self, result: &ConflictResult) -> bool {
        match self {
            Self::FixedConflict => result.has_fixed_conflict,
            Self::AnyConflict => result.has_conflict,
        }
    }
}

/// Why a batch was turned down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRejection {
    /// Position of the offending candidate in the batch
    pub index: usize,
    pub candidate: ActivitySlot,
    pub conflict: ConflictResult,
    /// Slots on the candidate's day that fit its duration
    pub alternative_slots: Vec<AlternativeSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum BatchVerdict {
    Accepted { candidates: Vec<ActivitySlot> },
    Rejected(BatchRejection),
}

impl BatchVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Existing activities and day bounds a candidate is checked against.
#[derive(Debug, Clone)]
pub struct DaySnapshot {
    pub existing: Vec<ActivitySlot>,
    pub day: DayWindow,
}

/// Fail-fast validator for batches of candidate activities.
#[derive(Debug, Clone, Copy)]
pub struct ProposalValidator {
    buffer_minutes: u32,
    reject_on: RejectOn,
}

impl ProposalValidator {
    pub fn new(buffer_minutes: u32) -> Self {
        Self {
            buffer_minutes,
            reject_on: RejectOn::default(),
        }
    }

    pub fn with_reject_on(mut self, reject_on: RejectOn) -> Self {
        self.reject_on = reject_on;
        self
    }

    /// Validate every candidate against the same snapshot.
    pub fn validate(
        &self,
        candidates: &[ActivitySlot],
        existing: &[ActivitySlot],
        day: &DayWindow,
    ) -> BatchVerdict {
        let snapshot = DaySnapshot {
            existing: existing.to_vec(),
            day: *day,
        };
        match self.validate_with(candidates, |_| Ok::<_, Infallible>(snapshot.clone())) {
            Ok(verdict) => verdict,
            Err(never) => match never {},
        }
    }

    /// Validate candidates, asking `snapshot_for` for a fresh snapshot of the
    /// persisted day before checking each one.
    ///
    /// # Errors
    /// Propagates errors from `snapshot_for`.
    pub fn validate_with<F, E>(
        &self,
        candidates: &[ActivitySlot],
        mut snapshot_for: F,
    ) -> Result<BatchVerdict, E>
    where
        F: FnMut(&ActivitySlot) -> Result<DaySnapshot, E>,
    {
        for (index, candidate) in candidates.iter().enumerate() {
            let snapshot = snapshot_for(candidate)?;
            let conflict = check_conflicts(candidate, &snapshot.existing, self.buffer_minutes);
            if !self.reject_on.rejects(&conflict) {
                continue;
            }

            let alternative_slots = find_alternative_slots(
                &snapshot.existing,
                candidate.rounded_minutes(),
                self.buffer_minutes,
                &snapshot.day,
            );
            tracing::debug!(
                index,
                candidate = %candidate.title,
                action = conflict.action.as_str(),
                alternatives = alternative_slots.len(),
                "batch rejected"
            );
            return Ok(BatchVerdict::Rejected(BatchRejection {
                index,
                candidate: candidate.clone(),
                conflict,
                alternative_slots,
            }));
        }

        Ok(BatchVerdict::Accepted {
            candidates: candidates.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::ConflictAction;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn day() -> DayWindow {
        DayWindow::parse_utc_day("2026-02-16").unwrap()
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 16, h, m, 0).unwrap()
    }

    fn slot(title: &str, start: DateTime<Utc>, end: DateTime<Utc>, fixed: bool) -> ActivitySlot {
        ActivitySlot::try_new(title, start, end).unwrap().with_fixed(fixed)
    }

    fn existing() -> Vec<ActivitySlot> {
        vec![
            slot("Standup", at(9, 0), at(9, 30), true),
            slot("Reading", at(14, 0), at(15, 0), false),
        ]
    }

    #[test]
    fn clean_batch_is_accepted() {
        let candidates = vec![
            slot("Gym", at(7, 0), at(8, 0), false),
            slot("Lunch", at(12, 0), at(13, 0), false),
        ];
        let verdict = ProposalValidator::new(15).validate(&candidates, &existing(), &day());
        assert_eq!(verdict, BatchVerdict::Accepted { candidates });
    }

    #[test]
    fn fixed_conflict_in_middle_rejects_whole_batch() {
        let candidates = vec![
            slot("Gym", at(7, 0), at(8, 0), false),
            slot("Call", at(9, 15), at(10, 0), false),
            slot("Lunch", at(12, 0), at(13, 0), false),
        ];
        let verdict = ProposalValidator::new(15).validate(&candidates, &existing(), &day());
        let BatchVerdict::Rejected(rejection) = verdict else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.index, 1);
        assert_eq!(rejection.candidate.title, "Call");
        assert_eq!(rejection.conflict.action, ConflictAction::FindAlternatives);
        assert!(!rejection.alternative_slots.is_empty());
        assert!(rejection.alternative_slots.iter().all(|s| s.duration_minutes == 45));
    }

    #[test]
    fn flexible_conflict_passes_by_default_but_not_strictly() {
        let candidates = vec![slot("Email", at(14, 30), at(15, 30), false)];
        let lenient = ProposalValidator::new(15);
        assert!(lenient.validate(&candidates, &existing(), &day()).is_accepted());

        let strict = lenient.with_reject_on(RejectOn::AnyConflict);
        let verdict = strict.validate(&candidates, &existing(), &day());
        match verdict {
            BatchVerdict::Rejected(r) => {
                assert_eq!(r.conflict.action, ConflictAction::ReshuffleFlexible)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn batch_members_are_not_cross_checked() {
        // Two overlapping candidates, both clear of the persisted day.
        let candidates = vec![
            slot("A", at(11, 0), at(12, 0), true),
            slot("B", at(11, 30), at(12, 30), true),
        ];
        let verdict = ProposalValidator::new(15)
            .with_reject_on(RejectOn::AnyConflict)
            .validate(&candidates, &existing(), &day());
        assert!(verdict.is_accepted());
    }

    #[test]
    fn snapshot_is_requested_per_candidate() {
        let candidates = vec![
            slot("A", at(11, 0), at(12, 0), false),
            slot("B", at(16, 0), at(17, 0), false),
        ];
        let mut calls = 0;
        let verdict = ProposalValidator::new(15)
            .validate_with(&candidates, |_| {
                calls += 1;
                Ok::<_, Infallible>(DaySnapshot {
                    existing: existing(),
                    day: day(),
                })
            })
            .unwrap();
        assert!(verdict.is_accepted());
        assert_eq!(calls, 2);
    }

    #[test]
    fn snapshot_errors_propagate() {
        let candidates = vec![slot("A", at(11, 0), at(12, 0), false)];
        let result = ProposalValidator::new(15).validate_with(&candidates, |_| {
            Err::<DaySnapshot, _>(crate::error::StoreError::Locked)
        });
        assert!(result.is_err());
    }

    #[test]
    fn alternatives_use_rounded_duration() {
        let existing = vec![slot("Standup", at(9, 0), at(10, 0), true)];
        let candidates = vec![slot(
            "Sync",
            at(9, 30),
            at(9, 30) + Duration::seconds(44 * 60 + 30),
            false,
        )];
        let verdict = ProposalValidator::new(15).validate(&candidates, &existing, &day());
        let BatchVerdict::Rejected(rejection) = verdict else {
            panic!("expected reject");
        };
        assert!(rejection.alternative_slots.iter().all(|s| s.duration_minutes == 45));
    }
}
