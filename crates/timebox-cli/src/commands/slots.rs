use clap::Args;
use std::path::PathBuf;
use timebox_core::AlternativeSlotFinder;

use super::{parse_day, print_json, read_activities, resolve_buffer, CmdResult};

#[derive(Args)]
pub struct SlotsArgs {
    /// JSON file with the existing activities
    #[arg(long)]
    existing: PathBuf,
    /// Required duration in minutes
    #[arg(long)]
    duration: u32,
    /// Day to search (YYYY-MM-DD, UTC)
    #[arg(long)]
    date: String,
    #[arg(long)]
    buffer: Option<u32>,
}

pub fn run(args: SlotsArgs) -> CmdResult {
    let existing = read_activities(&args.existing)?;
    let day = parse_day(&args.date)?;
    let buffer = resolve_buffer(args.buffer)?;

    let slots = AlternativeSlotFinder::new(buffer).find(&existing, args.duration, &day);
    print_json(&slots)
}
