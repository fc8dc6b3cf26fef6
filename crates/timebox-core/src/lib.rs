//! # Timebox Core Library
//!
//! Temporal reasoning for a time-blocking planner. Given a user's activities
//! for a day, the core decides whether a new activity fits, where it could go
//! instead, whether the day is over capacity and whether the user is working
//! too long without a break.
//!
//! ## Architecture
//!
//! - **Reasoning**: pure functions over activity slots (conflicts, alternative
//!   slots, burnout streaks, capacity triage)
//! - **Proposals**: wire types for the external reasoning service and the
//!   fail-fast batch validator in front of persistence
//! - **Service**: orchestration over injected store, audit, throttle and
//!   reasoner collaborators
//! - **Storage**: activity store port, in-memory store and TOML configuration
//!
//! ## Key Components
//!
//! - [`check_conflicts`]: buffer-aware conflict detection
//! - [`AlternativeSlotFinder`]: free slots of a requested duration
//! - [`detect_burnout`]: long work streaks
//! - [`analyze_capacity`]: overload detection and move suggestions
//! - [`SchedulingService`]: the write and proposal paths
//! - [`Config`]: application configuration management

pub mod activity;
pub mod audit;
pub mod burnout;
pub mod conflict;
pub mod day;
pub mod error;
pub mod policy;
pub mod proposal;
pub mod service;
pub mod slots;
pub mod storage;
pub mod throttle;
pub mod triage;

pub use activity::{ActivityCategory, ActivitySlot};
pub use audit::{AuditAction, AuditEntry, AuditSink, AuditSource, MemoryAuditLog};
pub use burnout::{detect_burnout, BurnoutWarning};
pub use conflict::{check_conflicts, ConflictAction, ConflictResult};
pub use day::DayWindow;
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use policy::{PolicyUpdate, UserPolicy};
pub use proposal::{
    BatchRejection, BatchVerdict, ProposalAction, ProposalValidator, ProposedActivity,
    ReasoningContext, RejectOn, ScheduleProposal, ScheduleReasoner,
};
pub use service::{
    ConfirmOutcome, DayAdvisories, PendingProposal, ProposalOutcome, SchedulingService,
    WriteOutcome,
};
pub use slots::{find_alternative_slots, AlternativeSlot, AlternativeSlotFinder};
pub use storage::{
    ActivityPatch, ActivityStatus, ActivityStore, Config, MemoryStore, NewActivity,
    StoredActivity,
};
pub use throttle::{FixedWindowThrottle, RequestThrottle, ThrottleDecision};
pub use triage::{analyze_capacity, SuggestedMove, TriageResult};
