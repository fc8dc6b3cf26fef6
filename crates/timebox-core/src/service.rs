//! Scheduling service: the write and proposal paths over injected
//! collaborators.
//!
//! The reasoning modules are pure. This type wires them to an activity
//! store, an audit sink, a request throttle and a reasoning service, and
//! decides what gets persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::activity::ActivitySlot;
use crate::audit::{AuditEntry, AuditSink, AuditSource, DEFAULT_AUDIT_LIMIT};
use crate::burnout::{detect_burnout, BurnoutWarning};
use crate::day::DayWindow;
use crate::error::{CoreError, Result, ValidationError};
use crate::policy::UserPolicy;
use crate::proposal::{
    optimize_prompt, BatchRejection, BatchVerdict, DaySnapshot, ProposalAction, ProposalValidator,
    ProposedActivity, ReasoningContext, RejectOn, ScheduleProposal, ScheduleReasoner,
};
use crate::storage::{ActivityPatch, ActivityStatus, ActivityStore, NewActivity, StoredActivity};
use crate::throttle::RequestThrottle;
use crate::triage::{analyze_capacity, TriageResult};

/// Burnout and triage findings for a day. Never blocks a write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAdvisories {
    pub date: NaiveDate,
    pub burnout_warnings: Vec<BurnoutWarning>,
    pub triage: TriageResult,
}

impl DayAdvisories {
    fn compute(slots: &[ActivitySlot], buffer_minutes: u32, day: &DayWindow) -> Self {
        Self {
            date: day.date(),
            burnout_warnings: detect_burnout(slots, buffer_minutes),
            triage: analyze_capacity(slots, buffer_minutes, day),
        }
    }
}

/// Result of a user-initiated create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome {
    Accepted {
        activity: StoredActivity,
        advisories: DayAdvisories,
    },
    Rejected(BatchRejection),
}

/// A validated proposal awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingProposal {
    pub proposal: ScheduleProposal,
    pub status: ActivityStatus,
    /// Findings for the day with the proposed activities included
    pub advisories: DayAdvisories,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProposalOutcome {
    Pending(PendingProposal),
    Rejected {
        proposal: ScheduleProposal,
        rejection: BatchRejection,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConfirmOutcome {
    Committed { activities: Vec<StoredActivity> },
    Rejected(BatchRejection),
}

/// Orchestrates conflict checks, proposals and persistence for many users.
///
/// Writes for one owner are serialized: the conflict check and the insert
/// or update it guards run under that owner's write lock.
pub struct SchedulingService<S, A, T, R> {
    store: S,
    audit: A,
    throttle: T,
    reasoner: R,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S, A, T, R> SchedulingService<S, A, T, R>
where
    S: ActivityStore,
    A: AuditSink,
    T: RequestThrottle,
    R: ScheduleReasoner,
{
    pub fn new(store: S, audit: A, throttle: T, reasoner: R) -> Self {
        Self {
            store,
            audit,
            throttle,
            reasoner,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    pub fn reasoner(&self) -> &R {
        &self.reasoner
    }

    /// Activities on `date`, ordered by start time.
    pub fn day(&self, owner: &str, date: NaiveDate) -> Result<Vec<StoredActivity>> {
        self.store.activities_on(owner, &DayWindow::utc_day(date))
    }

    /// Persist a new activity unless it collides with anything on its day.
    pub fn create(
        &self,
        owner: &str,
        policy: &UserPolicy,
        draft: ActivitySlot,
    ) -> Result<WriteOutcome> {
        policy.validate()?;
        draft.validate()?;

        let lock = self.write_lock(owner);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let validator = strict_validator(policy);
        let verdict = validator.validate_with(std::slice::from_ref(&draft), |slot| {
            self.snapshot(owner, slot, None)
        })?;
        if let BatchVerdict::Rejected(rejection) = verdict {
            warn!(
                owner,
                title = %draft.title,
                action = rejection.conflict.action.as_str(),
                "create rejected"
            );
            return Ok(WriteOutcome::Rejected(rejection));
        }

        let day = day_of(&draft);
        let stored = self.store.insert(owner, NewActivity::from(draft))?;
        self.audit.record(AuditEntry::created(
            owner,
            &stored.id,
            AuditSource::User,
            &stored,
        )?)?;
        info!(owner, id = %stored.id, "activity created");

        Ok(WriteOutcome::Accepted {
            advisories: self.advisories(owner, policy, &day)?,
            activity: stored,
        })
    }

    /// Apply `patch` to an existing activity, re-checking conflicts against
    /// every other activity on the resulting day.
    pub fn update(
        &self,
        owner: &str,
        policy: &UserPolicy,
        id: &str,
        patch: &ActivityPatch,
    ) -> Result<WriteOutcome> {
        policy.validate()?;
        let lock = self.write_lock(owner);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let before = self
            .store
            .get(owner, id)?
            .ok_or_else(|| not_found(id))?;
        let patched = patch.apply_to(&before.slot)?;

        let validator = strict_validator(policy);
        let verdict = validator.validate_with(std::slice::from_ref(&patched), |slot| {
            self.snapshot(owner, slot, Some(id))
        })?;
        if let BatchVerdict::Rejected(rejection) = verdict {
            warn!(owner, id, action = rejection.conflict.action.as_str(), "update rejected");
            return Ok(WriteOutcome::Rejected(rejection));
        }

        let after = self
            .store
            .update(owner, id, patch)?
            .ok_or_else(|| not_found(id))?;
        self.audit.record(AuditEntry::updated(
            owner,
            id,
            AuditSource::User,
            &before,
            &after,
        )?)?;
        info!(owner, id, "activity updated");

        let day = day_of(&after.slot);
        Ok(WriteOutcome::Accepted {
            advisories: self.advisories(owner, policy, &day)?,
            activity: after,
        })
    }

    pub fn delete(&self, owner: &str, id: &str) -> Result<()> {
        let lock = self.write_lock(owner);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let before = self
            .store
            .get(owner, id)?
            .ok_or_else(|| not_found(id))?;
        if !self.store.delete(owner, id)? {
            return Err(not_found(id));
        }
        self.audit
            .record(AuditEntry::deleted(owner, id, AuditSource::User, &before)?)?;
        info!(owner, id, "activity deleted");
        Ok(())
    }

    /// Ask the reasoning service for a proposal and gate it on fixed
    /// conflicts. Nothing is persisted.
    ///
    /// # Errors
    /// Returns [`CoreError::Throttled`] when the owner has exhausted the
    /// request budget, and propagates reasoning-service failures.
    pub fn propose(
        &self,
        owner: &str,
        policy: &UserPolicy,
        prompt: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ProposalOutcome> {
        if prompt.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "prompt".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        policy.validate()?;
        self.admit(owner, now)?;

        let day = DayWindow::utc_day(date);
        let existing = self.day_slots(owner, &day, None)?;
        let context = ReasoningContext::build(&existing, policy, &day, now);
        debug!(owner, existing = existing.len(), "requesting proposal");

        let mut proposal = self.reasoner.generate_proposal(prompt, &context)?;
        let candidates = proposal.new_slots()?;

        let validator = ProposalValidator::new(policy.buffer_minutes);
        let verdict =
            validator.validate_with(&candidates, |slot| self.snapshot(owner, slot, None))?;
        let candidates = match verdict {
            BatchVerdict::Accepted { candidates } => candidates,
            BatchVerdict::Rejected(rejection) => {
                warn!(owner, index = rejection.index, "proposal hits a fixed activity");
                return Ok(ProposalOutcome::Rejected {
                    proposal,
                    rejection,
                });
            }
        };

        let mut combined = existing;
        combined.extend(candidates);
        let advisories = DayAdvisories::compute(&combined, policy.buffer_minutes, &day);
        if advisories.triage.is_overload {
            proposal.action = ProposalAction::TriageRequired;
        }
        info!(owner, action = %proposal.action, "proposal pending confirmation");

        Ok(ProposalOutcome::Pending(PendingProposal {
            proposal,
            status: ActivityStatus::PendingConfirmation,
            advisories,
        }))
    }

    /// [`propose`](Self::propose) with the canned whole-day optimization prompt.
    pub fn optimize(
        &self,
        owner: &str,
        policy: &UserPolicy,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ProposalOutcome> {
        self.propose(owner, policy, &optimize_prompt(date), date, now)
    }

    /// Persist proposed activities the user accepted.
    ///
    /// Every candidate is checked against its own day first; a single
    /// conflict of any kind rejects the whole batch and nothing is written.
    pub fn confirm(
        &self,
        owner: &str,
        policy: &UserPolicy,
        activities: &[ProposedActivity],
        ai_reasoning: Option<&str>,
    ) -> Result<ConfirmOutcome> {
        if activities.is_empty() {
            return Err(ValidationError::EmptyCollection("activities".into()).into());
        }
        policy.validate()?;
        let candidates = activities
            .iter()
            .map(ActivitySlot::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let lock = self.write_lock(owner);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let validator = strict_validator(policy);
        let verdict =
            validator.validate_with(&candidates, |slot| self.snapshot(owner, slot, None))?;
        let candidates = match verdict {
            BatchVerdict::Accepted { candidates } => candidates,
            BatchVerdict::Rejected(rejection) => {
                warn!(owner, index = rejection.index, "confirmation rejected");
                return Ok(ConfirmOutcome::Rejected(rejection));
            }
        };

        let mut committed = Vec::with_capacity(candidates.len());
        for slot in candidates {
            let stored = self.store.insert(
                owner,
                NewActivity {
                    slot,
                    status: ActivityStatus::Planned,
                    ai_reasoning: ai_reasoning.map(str::to_string),
                },
            )?;
            self.audit
                .record(AuditEntry::created(owner, &stored.id, AuditSource::Ai, &stored)?)?;
            committed.push(stored);
        }
        info!(owner, count = committed.len(), "proposal confirmed");

        Ok(ConfirmOutcome::Committed {
            activities: committed,
        })
    }

    /// Burnout and triage findings for `date`.
    pub fn overview(
        &self,
        owner: &str,
        policy: &UserPolicy,
        date: NaiveDate,
    ) -> Result<DayAdvisories> {
        policy.validate()?;
        self.advisories(owner, policy, &DayWindow::utc_day(date))
    }

    /// Most recent audit entries for `owner`, newest first.
    pub fn history(&self, owner: &str, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        self.audit.recent(owner, limit.unwrap_or(DEFAULT_AUDIT_LIMIT))
    }

    /// Per-owner lock held from conflict check to commit.
    fn write_lock(&self, owner: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(owner.to_string()).or_default())
    }

    fn admit(&self, owner: &str, now: DateTime<Utc>) -> Result<()> {
        let decision = self.throttle.check(owner, now);
        if !decision.allowed {
            warn!(owner, reset_at = %decision.reset_at, "request throttled");
            return Err(CoreError::Throttled {
                reset_at: decision.reset_at,
            });
        }
        debug!(owner, remaining = decision.remaining, "request admitted");
        Ok(())
    }

    fn day_slots(
        &self,
        owner: &str,
        day: &DayWindow,
        exclude: Option<&str>,
    ) -> Result<Vec<ActivitySlot>> {
        Ok(self
            .store
            .activities_on(owner, day)?
            .into_iter()
            .filter(|a| Some(a.id.as_str()) != exclude)
            .map(|a| a.slot)
            .collect())
    }

    /// Persisted activities on the day `slot` starts in.
    fn snapshot(
        &self,
        owner: &str,
        slot: &ActivitySlot,
        exclude: Option<&str>,
    ) -> Result<DaySnapshot> {
        let day = day_of(slot);
        Ok(DaySnapshot {
            existing: self.day_slots(owner, &day, exclude)?,
            day,
        })
    }

    fn advisories(
        &self,
        owner: &str,
        policy: &UserPolicy,
        day: &DayWindow,
    ) -> Result<DayAdvisories> {
        let slots = self.day_slots(owner, day, None)?;
        Ok(DayAdvisories::compute(&slots, policy.buffer_minutes, day))
    }
}

fn strict_validator(policy: &UserPolicy) -> ProposalValidator {
    ProposalValidator::new(policy.buffer_minutes).with_reject_on(RejectOn::AnyConflict)
}

fn day_of(slot: &ActivitySlot) -> DayWindow {
    DayWindow::utc_day(slot.start_time.date_naive())
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound { id: id.to_string() }
}
