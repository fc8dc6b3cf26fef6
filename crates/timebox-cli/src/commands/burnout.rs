use clap::Args;
use std::path::PathBuf;
use timebox_core::detect_burnout;

use super::{print_json, read_activities, resolve_buffer, CmdResult};

#[derive(Args)]
pub struct BurnoutArgs {
    /// JSON file with the day's activities
    #[arg(long)]
    activities: PathBuf,
    #[arg(long)]
    buffer: Option<u32>,
}

pub fn run(args: BurnoutArgs) -> CmdResult {
    let activities = read_activities(&args.activities)?;
    let buffer = resolve_buffer(args.buffer)?;
    print_json(&detect_burnout(&activities, buffer))
}
