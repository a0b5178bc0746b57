//! Route planner using time-dependent Dijkstra search.
//!
//! This module answers: "what is the best way from this station to that
//! one, leaving at this time?"
//!
//! Costs are either distance or elapsed time. In duration mode the cost of a
//! section depends on when the traveller reaches it, so edge costs are
//! evaluated during the search from the traveller's arrival state. Walking
//! transfers between nearby stations are synthesized on demand.

mod config;
mod cost;
mod search;

pub use config::SearchConfig;
pub use search::{Itinerary, Optimize, Planner, RouteRequest, SearchError};
