use clap::Args;
use std::path::PathBuf;
use timebox_core::{ProposalValidator, RejectOn, ScheduleProposal};

use super::{parse_day, print_json, read_activities, read_json, resolve_buffer, CmdResult};

#[derive(Args)]
pub struct ValidateArgs {
    /// JSON file with the reasoning-service proposal
    #[arg(long)]
    proposal: PathBuf,
    /// JSON file with the persisted activities of the day
    #[arg(long)]
    existing: PathBuf,
    /// Day the proposal targets (YYYY-MM-DD, UTC)
    #[arg(long)]
    date: String,
    #[arg(long)]
    buffer: Option<u32>,
    /// Reject on any conflict, not only fixed ones
    #[arg(long)]
    strict: bool,
}

pub fn run(args: ValidateArgs) -> CmdResult {
    let proposal: ScheduleProposal = read_json(&args.proposal)?;
    let candidates = proposal.new_slots()?;
    let existing = read_activities(&args.existing)?;
    let day = parse_day(&args.date)?;
    let buffer = resolve_buffer(args.buffer)?;

    let reject_on = if args.strict {
        RejectOn::AnyConflict
    } else {
        RejectOn::FixedConflict
    };
    let verdict = ProposalValidator::new(buffer)
        .with_reject_on(reject_on)
        .validate(&candidates, &existing, &day);
    tracing::debug!(accepted = verdict.is_accepted(), "proposal validated");
    print_json(&verdict)
}
