//! Proposals from the reasoning service and the validation gate in front of
//! persistence.

mod reasoner;
mod types;
mod validator;

pub use reasoner::{optimize_prompt, ReasoningContext, ScheduleContextEntry, ScheduleReasoner};
pub use types::{
    ProposalAction, ProposalData, ProposedActivity, ProposedSlot, ScheduleProposal,
};
pub use validator::{BatchRejection, BatchVerdict, DaySnapshot, ProposalValidator, RejectOn};
