use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use timebox_core::{
    check_conflicts, find_alternative_slots, ActivitySlot, AlternativeSlot, ConflictResult,
    DayWindow,
};

use super::{print_json, read_activities, read_json, resolve_buffer, CmdResult};

#[derive(Args)]
pub struct CheckArgs {
    /// JSON file with the candidate activity
    #[arg(long)]
    candidate: PathBuf,
    /// JSON file with the existing activities
    #[arg(long)]
    existing: PathBuf,
    /// Buffer in minutes (defaults to the configured policy)
    #[arg(long)]
    buffer: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport {
    #[serde(flatten)]
    conflict: ConflictResult,
    /// Free slots on the candidate's day, only when there is a conflict
    alternative_slots: Vec<AlternativeSlot>,
}

pub fn run(args: CheckArgs) -> CmdResult {
    let candidate: ActivitySlot = read_json(&args.candidate)?;
    candidate.validate()?;
    let existing = read_activities(&args.existing)?;
    let buffer = resolve_buffer(args.buffer)?;

    let conflict = check_conflicts(&candidate, &existing, buffer);
    let alternative_slots = if conflict.has_conflict {
        let day = DayWindow::utc_day(candidate.start_time.date_naive());
        find_alternative_slots(&existing, candidate.rounded_minutes(), buffer, &day)
    } else {
        Vec::new()
    };

    print_json(&CheckReport {
        conflict,
        alternative_slots,
    })
}
