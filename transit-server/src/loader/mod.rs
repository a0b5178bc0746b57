//! Parsers for the network's text sources.
//!
//! Both sources are `;`-separated records, one per line. Fields are trimmed
//! and blank lines are skipped, but still count towards the line numbers
//! reported in errors.

mod error;
mod schedule;
mod topology;

use std::path::Path;

use tracing::debug;

use crate::domain::Plan;

pub use error::LoadError;
pub use schedule::{load_schedule, parse_schedule};
pub use topology::{load_topology, parse_topology};

/// Load a plan, merging in a schedule if one is given.
pub fn load_plan(topology: &Path, schedule: Option<&Path>) -> Result<Plan, LoadError> {
    let plan = load_topology(topology)?;
    match schedule {
        Some(path) => {
            let entries = load_schedule(path)?;
            let plan = plan.with_schedule(&entries)?;
            debug!(
                scheduled = plan.lines().filter(|l| l.is_scheduled()).count(),
                "schedule merged"
            );
            Ok(plan)
        }
        None => Ok(plan),
    }
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Non-blank records with their 1-based line numbers and trimmed fields.
fn records(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line.split(';').map(str::trim).collect()))
}
