//! The plan: an immutable snapshot of the whole transit graph.
//!
//! A `Plan` is produced by a [`PlanBuilder`] and never mutated afterwards.
//! Schedule updates go through [`Plan::with_schedule`], which returns a new
//! value and leaves the receiver untouched, so any `Arc<Plan>` a search holds is
//! always one consistent version of the network.

use std::collections::HashMap;
use std::sync::Arc;

use super::{DomainError, Line, LineId, Section, Station, TimeOfDay};

/// One departure record from a schedule source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub line: LineId,
    pub station: String,
    pub departure: TimeOfDay,
}

impl ScheduleEntry {
    pub fn new(line: LineId, station: &str, departure: TimeOfDay) -> Self {
        Self {
            line,
            station: station.trim().to_string(),
            departure,
        }
    }
}

/// Stations, sections and lines of a network.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Outgoing sections keyed by start station name. Every station name that
    /// appears in any section is a key, even with no outgoing sections.
    adjacency: HashMap<String, Vec<Arc<Section>>>,

    /// Interned stations, sorted by name then coordinates.
    stations: Vec<Arc<Station>>,

    lines: HashMap<LineId, Line>,
}

impl Plan {
    /// A plan with no stations.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sections leaving the station called `name`.
    pub fn sections_from(&self, name: &str) -> &[Arc<Section>] {
        self.adjacency.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_station(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    /// The plan's own copy of a station name, if present.
    pub fn station_name(&self, name: &str) -> Option<&str> {
        self.adjacency
            .get_key_value(name)
            .map(|(key, _)| key.as_str())
    }

    pub fn station_names(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Every distinct station, sorted by name.
    pub fn stations(&self) -> &[Arc<Station>] {
        &self.stations
    }

    /// All stations called `name` (several when the same name is used at
    /// different coordinates).
    pub fn stations_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Arc<Station>> {
        let first = self.stations.partition_point(|s| s.name() < name);
        self.stations[first..]
            .iter()
            .take_while(move |s| s.name() == name)
    }

    pub fn line(&self, id: &LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    /// Number of distinct station names (graph vertices).
    pub fn station_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn section_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Build a new plan with `entries` merged into its lines.
    ///
    /// The receiver is not modified, whether the merge succeeds or fails.
    /// Sections are shared with the receiver; they are immutable, so only the
    /// line schedules differ between the two plans.
    pub fn with_schedule(&self, entries: &[ScheduleEntry]) -> Result<Plan, DomainError> {
        let mut next = self.clone();
        for entry in entries {
            let line = next
                .lines
                .get_mut(&entry.line)
                .ok_or_else(|| DomainError::UndefinedLine(entry.line.clone()))?;
            line.set_start(&entry.station)?;
            line.add_departure(entry.departure);
        }
        Ok(next)
    }
}

/// Incremental construction of a [`Plan`].
///
/// Stations with equal name and coordinates are interned to one `Arc`.
#[derive(Debug, Default)]
pub struct PlanBuilder {
    stations: HashMap<Station, Arc<Station>>,
    adjacency: HashMap<String, Vec<Arc<Section>>>,
    lines: HashMap<LineId, Line>,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the shared instance for `station`, creating it if needed.
    pub fn intern(&mut self, station: Station) -> Arc<Station> {
        if let Some(existing) = self.stations.get(&station) {
            return existing.clone();
        }
        let shared = Arc::new(station.clone());
        self.stations.insert(station, shared.clone());
        shared
    }

    /// Add a section of `line` from `start` to `arrival`.
    pub fn add_section(
        &mut self,
        start: Station,
        arrival: Station,
        distance: f64,
        duration: u32,
        line: LineId,
    ) -> Arc<Section> {
        let start = self.intern(start);
        let arrival = self.intern(arrival);

        self.adjacency
            .entry(arrival.name().to_string())
            .or_default();

        let section = Arc::new(Section::new(
            start.clone(),
            arrival,
            distance,
            duration,
            line.clone(),
        ));
        self.adjacency
            .entry(start.name().to_string())
            .or_default()
            .push(section.clone());
        self.lines
            .entry(line.clone())
            .or_insert_with(|| Line::new(line))
            .push_section(section.clone());
        section
    }

    pub fn build(self) -> Plan {
        let mut stations: Vec<Arc<Station>> = self.stations.into_values().collect();
        stations.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.coord().x.total_cmp(&b.coord().x))
                .then_with(|| a.coord().y.total_cmp(&b.coord().y))
        });
        Plan {
            adjacency: self.adjacency,
            stations,
            lines: self.lines,
        }
    }
}
