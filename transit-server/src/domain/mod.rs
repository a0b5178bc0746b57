//! Domain types for the transit journey planner.
//!
//! This module contains the graph model: stations, sections, lines and the
//! plan that ties them together. All types enforce their invariants at
//! construction time, and a built `Plan` is never mutated, so code holding a
//! reference to one can trust it for as long as it keeps it.

mod error;
mod line;
mod plan;
mod route;
mod section;
mod station;
mod time;

pub use error::DomainError;
pub use line::{DWELL_SECS, Line, Run};
pub use plan::{Plan, PlanBuilder, ScheduleEntry};
pub use route::Route;
pub use section::{LineId, Section};
pub use station::{Coord, InvalidStation, Station, WALKING_SPEED_M_PER_S};
pub use time::{SECONDS_PER_DAY, TimeError, TimeOfDay};
