//! Seam to the external natural-language reasoning service.
//!
//! The core never talks to a model. It assembles a [`ReasoningContext`]
//! (the day's activities plus advisory burnout and triage findings) and hands
//! it to whatever [`ScheduleReasoner`] the caller injected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::types::ScheduleProposal;
use crate::activity::{ActivityCategory, ActivitySlot};
use crate::burnout::{detect_burnout, BurnoutWarning};
use crate::day::DayWindow;
use crate::error::Result;
use crate::policy::UserPolicy;
use crate::triage::{analyze_capacity, TriageResult};

/// One existing activity as shown to the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleContextEntry {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_fixed: bool,
    pub priority: u8,
    pub category: ActivityCategory,
}

impl From<&ActivitySlot> for ScheduleContextEntry {
    fn from(slot: &ActivitySlot) -> Self {
        Self {
            title: slot.title.clone(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            is_fixed: slot.is_fixed,
            priority: slot.priority,
            category: slot.category,
        }
    }
}

/// Everything the reasoning service is told about the user's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningContext {
    pub current_time: DateTime<Utc>,
    pub buffer_minutes: u32,
    pub sleep_start: String,
    pub existing_schedules: Vec<ScheduleContextEntry>,
    /// Advisory only; nothing enforces these.
    pub burnout_warnings: Vec<BurnoutWarning>,
    /// Advisory only; nothing enforces this.
    pub triage: TriageResult,
}

impl ReasoningContext {
    /// Build the context for `existing` on `day`, annotated with burnout and
    /// triage findings under `policy`.
    pub fn build(
        existing: &[ActivitySlot],
        policy: &UserPolicy,
        day: &DayWindow,
        current_time: DateTime<Utc>,
    ) -> Self {
        Self {
            current_time,
            buffer_minutes: policy.buffer_minutes,
            sleep_start: policy.sleep_start.clone(),
            existing_schedules: existing.iter().map(ScheduleContextEntry::from).collect(),
            burnout_warnings: detect_burnout(existing, policy.buffer_minutes),
            triage: analyze_capacity(existing, policy.buffer_minutes, day),
        }
    }

    /// Compact JSON used when the context is embedded in prompt text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// External capability that turns a prompt into a structured proposal.
pub trait ScheduleReasoner: Send + Sync {
    fn generate_proposal(
        &self,
        prompt: &str,
        context: &ReasoningContext,
    ) -> Result<ScheduleProposal>;
}

/// Prompt used when the user asks to optimize a whole day.
pub fn optimize_prompt(date: NaiveDate) -> String {
    format!(
        "Optimize my schedule for {date}. Rearrange flexible activities for better flow, \
         protect fixed ones, ensure buffers."
    )
}
