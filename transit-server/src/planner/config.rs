//! Search configuration for the route planner.

/// Configuration parameters for route search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Maximum straight-line distance for a synthesized walking transfer (meters).
    /// Stations this far apart or further are not connected on foot.
    pub max_walk_distance_m: f64,

    /// Factor applied to walking distance and duration when costing a walk,
    /// so transit wins whenever it is competitive.
    pub walk_penalty: f64,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_walk_distance_m: f64, walk_penalty: f64) -> Self {
        Self {
            max_walk_distance_m,
            walk_penalty,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_walk_distance_m: 1000.0,
            walk_penalty: 1.5,
        }
    }
}
