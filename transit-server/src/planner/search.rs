//! Time-dependent Dijkstra route search.
//!
//! Vertices are station names. Edges are the plan's sections plus, when
//! walking is allowed, walking transfers synthesized towards every station
//! within the walking threshold. The cost of an edge depends on the arrival
//! state at its tail (see [`super::cost`]), which this module keeps in a
//! per-search table.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::{Plan, Route, SECONDS_PER_DAY, Section, TimeOfDay};

use super::config::SearchConfig;
use super::cost::traverse;

/// Error from route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// A required request field is missing or empty
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// No route under the requested mode, time and flags
    #[error("no route found from {start} to {arrival}")]
    NotFound { start: String, arrival: String },
}

/// What a search minimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Optimize {
    /// Total distance in meters. Schedules are ignored.
    #[default]
    Distance,
    /// Arrival time, waiting for scheduled departures.
    Duration,
}

impl FromStr for Optimize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(Optimize::Distance),
            "duration" => Ok(Optimize::Duration),
            other => Err(format!("unknown optimisation mode: {other}")),
        }
    }
}

impl fmt::Display for Optimize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Optimize::Distance => f.write_str("distance"),
            Optimize::Duration => f.write_str("duration"),
        }
    }
}

/// Request for route search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    /// Name of the station to leave from.
    pub start: String,

    /// Name of the station to reach.
    pub arrival: String,

    /// Time of day the traveller leaves `start`.
    pub departure: TimeOfDay,

    pub optimize: Optimize,

    /// Whether walking transfers between nearby stations may be used.
    pub allow_walking: bool,
}

impl RouteRequest {
    /// A distance-optimised request without walking, leaving at midnight.
    pub fn new(start: &str, arrival: &str) -> Self {
        Self {
            start: start.to_string(),
            arrival: arrival.to_string(),
            departure: TimeOfDay::midnight(),
            optimize: Optimize::Distance,
            allow_walking: false,
        }
    }

    pub fn departing_at(mut self, departure: TimeOfDay) -> Self {
        self.departure = departure;
        self
    }

    pub fn optimize(mut self, optimize: Optimize) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn walking(mut self, allow_walking: bool) -> Self {
        self.allow_walking = allow_walking;
        self
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.start.trim().is_empty() {
            return Err(SearchError::InvalidArgument("start station is empty"));
        }
        if self.arrival.trim().is_empty() {
            return Err(SearchError::InvalidArgument("arrival station is empty"));
        }
        Ok(())
    }

    fn not_found(&self) -> SearchError {
        SearchError::NotFound {
            start: self.start.trim().to_string(),
            arrival: self.arrival.trim().to_string(),
        }
    }
}

/// A found route with the cost it was selected on.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub route: Route,

    /// Label of the arrival station: meters or seconds depending on the mode.
    pub cost: f64,

    /// Time of day of arrival.
    pub arrival: TimeOfDay,

    /// Midnights crossed between departure and arrival.
    pub days_later: u32,
}

/// Priority queue entry. Orders by lowest cost, then by station name so that
/// equal-cost results are reproducible.
#[derive(Debug, Clone, Copy)]
struct Label<'a> {
    cost: f64,
    station: &'a str,
}

impl Ord for Label<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.station.cmp(self.station))
    }
}

impl PartialOrd for Label<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Label<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label<'_> {}

/// Best known state of a vertex during one search.
#[derive(Debug, Clone)]
struct Best {
    cost: f64,
    /// Seconds since midnight of the query day.
    arrival: u32,
    via: Option<Arc<Section>>,
}

/// An outgoing edge and the plan-owned name of its head station.
struct Edge<'a> {
    section: Arc<Section>,
    head: &'a str,
}

/// Route planner over one plan snapshot.
pub struct Planner<'a> {
    plan: &'a Plan,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(plan: &'a Plan, config: &'a SearchConfig) -> Self {
        Self { plan, config }
    }

    /// Shortest route by distance, without walking.
    pub fn find_path_dist_opt(&self, start: &str, arrival: &str) -> Result<Route, SearchError> {
        self.find_path(&RouteRequest::new(start, arrival))
    }

    /// Find the best route for `request`.
    pub fn find_path(&self, request: &RouteRequest) -> Result<Route, SearchError> {
        self.search(request).map(|itinerary| itinerary.route)
    }

    /// Find the best route for `request`, with its cost and arrival time.
    pub fn search(&self, request: &RouteRequest) -> Result<Itinerary, SearchError> {
        request.validate()?;

        let start = self
            .plan
            .station_name(request.start.trim())
            .ok_or_else(|| request.not_found())?;
        let arrival = self
            .plan
            .station_name(request.arrival.trim())
            .ok_or_else(|| request.not_found())?;

        let departure = request.departure.seconds_from_midnight();
        if start == arrival {
            return Ok(Itinerary {
                route: Route::empty(),
                cost: 0.0,
                arrival: request.departure,
                days_later: 0,
            });
        }

        let mut best: HashMap<&'a str, Best> = HashMap::new();
        let mut settled: HashSet<&'a str> = HashSet::new();
        let mut queue = BinaryHeap::new();

        best.insert(
            start,
            Best {
                cost: 0.0,
                arrival: departure,
                via: None,
            },
        );
        queue.push(Label {
            cost: 0.0,
            station: start,
        });

        while let Some(Label { cost, station: u }) = queue.pop() {
            if !settled.insert(u) {
                continue;
            }
            if u == arrival {
                debug!(
                    start,
                    arrival,
                    settled = settled.len(),
                    mode = %request.optimize,
                    "route found"
                );
                return self.reconstruct(request, &best, start, arrival);
            }

            let at = best[u].arrival;
            for edge in self.edges_from(u, request.allow_walking) {
                if settled.contains(edge.head) {
                    continue;
                }
                let Some(step) =
                    traverse(self.plan, self.config, request.optimize, at, &edge.section)
                else {
                    trace!(section = %edge.section, at, "no feasible departure");
                    continue;
                };

                let candidate = cost + step.cost;
                let improves = best
                    .get(edge.head)
                    .is_none_or(|known| candidate < known.cost);
                if improves {
                    best.insert(
                        edge.head,
                        Best {
                            cost: candidate,
                            arrival: step.arrival,
                            via: Some(edge.section),
                        },
                    );
                    queue.push(Label {
                        cost: candidate,
                        station: edge.head,
                    });
                }
            }
        }

        debug!(start, arrival, settled = settled.len(), "no route");
        Err(request.not_found())
    }

    /// Sections leaving `u`, plus walking transfers when allowed.
    fn edges_from(&self, u: &'a str, allow_walking: bool) -> Vec<Edge<'a>> {
        let mut edges: Vec<Edge<'a>> = self
            .plan
            .sections_from(u)
            .iter()
            .map(|section| Edge {
                section: section.clone(),
                head: section.arrival().name(),
            })
            .collect();

        if allow_walking {
            for from in self.plan.stations_named(u) {
                for to in self.plan.stations() {
                    if to.name() == u {
                        continue;
                    }
                    if from.distance_to(to) < self.config.max_walk_distance_m {
                        edges.push(Edge {
                            section: Arc::new(Section::walking(from.clone(), to.clone())),
                            head: to.name(),
                        });
                    }
                }
            }
        }

        edges
    }

    /// Walk predecessor sections back from `arrival` to `start`.
    fn reconstruct(
        &self,
        request: &RouteRequest,
        best: &HashMap<&'a str, Best>,
        start: &str,
        arrival: &str,
    ) -> Result<Itinerary, SearchError> {
        let mut sections = Vec::new();
        let mut current = arrival;

        while current != start {
            // A path can visit each settled vertex at most once.
            if sections.len() > best.len() {
                return Err(request.not_found());
            }
            let section = best
                .get(current)
                .and_then(|b| b.via.as_ref())
                .ok_or_else(|| request.not_found())?;
            current = section.start().name();
            sections.push(section.clone());
        }
        sections.reverse();

        let target = &best[arrival];
        Ok(Itinerary {
            route: Route::new(sections),
            cost: target.cost,
            arrival: TimeOfDay::from_seconds(target.arrival),
            days_later: target.arrival / SECONDS_PER_DAY,
        })
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
