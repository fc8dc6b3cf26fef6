pub mod burnout;
pub mod check;
pub mod config;
pub mod slots;
pub mod triage;
pub mod validate;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use timebox_core::{ActivitySlot, Config, DayWindow};

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| format!("invalid JSON in {}: {e}", path.display()))?;
    Ok(value)
}

/// Read a JSON array of activities, rejecting any with a bad range or priority.
pub fn read_activities(path: &Path) -> Result<Vec<ActivitySlot>, Box<dyn Error>> {
    let activities: Vec<ActivitySlot> = read_json(path)?;
    for activity in &activities {
        activity.validate()?;
    }
    Ok(activities)
}

/// Explicit `--buffer`, else the configured default.
pub fn resolve_buffer(flag: Option<u32>) -> Result<u32, Box<dyn Error>> {
    match flag {
        Some(minutes) => Ok(minutes),
        None => Ok(Config::load()?.policy.buffer_minutes),
    }
}

/// UTC calendar day for a `YYYY-MM-DD` argument.
pub fn parse_day(date: &str) -> Result<DayWindow, Box<dyn Error>> {
    Ok(DayWindow::parse_utc_day(date)?)
}

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
