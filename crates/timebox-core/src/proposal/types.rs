//! Wire types of a schedule proposal produced by the reasoning service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::activity::{ActivityCategory, ActivitySlot, MAX_PRIORITY, MIN_PRIORITY};
use crate::error::ValidationError;

/// What the reasoning service says it did with the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalAction {
    DraftCreated,
    OptimizationSuggested,
    TriageRequired,
}

impl ProposalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DraftCreated => "DRAFT_CREATED",
            Self::OptimizationSuggested => "OPTIMIZATION_SUGGESTED",
            Self::TriageRequired => "TRIAGE_REQUIRED",
        }
    }
}

impl fmt::Display for ProposalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An activity as proposed by the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedActivity {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_fixed: bool,
    pub category: ActivityCategory,
    pub priority: u8,
}

impl TryFrom<&ProposedActivity> for ActivitySlot {
    type Error = ValidationError;

    fn try_from(p: &ProposedActivity) -> Result<Self, Self::Error> {
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&p.priority) {
            return Err(ValidationError::InvalidPriority(p.priority));
        }
        let mut slot = ActivitySlot::try_new(p.title.clone(), p.start, p.end)?
            .with_fixed(p.is_fixed)
            .with_category(p.category);
        slot.priority = p.priority;
        Ok(slot)
    }
}

/// A suggested free window, without duration bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalData {
    #[serde(default)]
    pub new_activities: Vec<ProposedActivity>,
    #[serde(default)]
    pub shifted_activities: Vec<ProposedActivity>,
    #[serde(default)]
    pub alternative_slots: Vec<ProposedSlot>,
}

/// Structured response of the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleProposal {
    pub action: ProposalAction,
    pub summary: String,
    pub data: ProposalData,
    pub ai_reasoning: String,
}

impl ScheduleProposal {
    /// Convert `new_activities` into slots, failing on the first malformed one.
    pub fn new_slots(&self) -> Result<Vec<ActivitySlot>, ValidationError> {
        self.data
            .new_activities
            .iter()
            .map(ActivitySlot::try_from)
            .collect()
    }
}
