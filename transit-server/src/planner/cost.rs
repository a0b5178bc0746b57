//! Edge cost evaluation.
//!
//! The cost of a section depends on when the traveller reaches its start, so
//! it is computed per relaxation from the traveller's arrival state. Nothing
//! is ever written back to the section or the plan.

use crate::domain::{Plan, Section};

use super::config::SearchConfig;
use super::search::Optimize;

/// Outcome of traversing one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Step {
    /// Cost added to the label, in meters or seconds depending on the mode.
    pub cost: f64,
    /// Arrival at the section's end, in seconds since midnight of the query day.
    pub arrival: u32,
}

/// Cost of traversing `section` when reaching its start at `at`.
///
/// Returns `None` if the section cannot be used at that time: in duration
/// mode, a scheduled section with no run left today, or whose line is
/// missing from the plan or unscheduled.
pub(crate) fn traverse(
    plan: &Plan,
    config: &SearchConfig,
    optimize: Optimize,
    at: u32,
    section: &Section,
) -> Option<Step> {
    let Some(line_id) = section.line() else {
        return Some(walk(config, optimize, at, section));
    };

    match optimize {
        Optimize::Distance => Some(Step {
            cost: section.distance(),
            arrival: at.saturating_add(section.duration()),
        }),
        Optimize::Duration => {
            let run = plan.line(line_id)?.next_run(section, at)?;
            Some(Step {
                cost: f64::from(run.arrival - at),
                arrival: run.arrival,
            })
        }
    }
}

/// Walks cost the same at any time of day.
fn walk(config: &SearchConfig, optimize: Optimize, at: u32, section: &Section) -> Step {
    let cost = match optimize {
        Optimize::Distance => penalised(section.distance(), config.walk_penalty),
        Optimize::Duration => penalised(f64::from(section.duration()), config.walk_penalty),
    };
    Step {
        cost,
        arrival: at.saturating_add(section.duration()),
    }
}

fn penalised(value: f64, penalty: f64) -> f64 {
    (value * penalty).ceil()
}
