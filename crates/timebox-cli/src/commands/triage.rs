use clap::Args;
use std::path::PathBuf;
use timebox_core::analyze_capacity;

use super::{parse_day, print_json, read_activities, resolve_buffer, CmdResult};

#[derive(Args)]
pub struct TriageArgs {
    /// JSON file with the day's activities
    #[arg(long)]
    activities: PathBuf,
    /// Day being planned (YYYY-MM-DD, UTC)
    #[arg(long)]
    date: String,
    #[arg(long)]
    buffer: Option<u32>,
}

pub fn run(args: TriageArgs) -> CmdResult {
    let activities = read_activities(&args.activities)?;
    let day = parse_day(&args.date)?;
    let buffer = resolve_buffer(args.buffer)?;
    print_json(&analyze_capacity(&activities, buffer, &day))
}
