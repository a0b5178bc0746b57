//! Route: the ordered sections a search returns.

use std::sync::Arc;

use super::Section;

/// An ordered path of sections from a start station to an arrival station.
///
/// Consecutive sections chain: each section's arrival station name is the
/// next section's start station name. An empty route means start and arrival
/// are the same station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    sections: Vec<Arc<Section>>,
}

impl Route {
    pub fn new(sections: Vec<Arc<Section>>) -> Self {
        Self { sections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[Arc<Section>] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sum of section distances, in meters.
    pub fn total_distance(&self) -> f64 {
        self.sections.iter().map(|s| s.distance()).sum()
    }

    /// Sum of nominal section durations, in seconds. Waiting is not included.
    pub fn total_duration(&self) -> u32 {
        self.sections.iter().map(|s| s.duration()).sum()
    }

    /// True if every section starts where the previous one arrived.
    pub fn is_chained(&self) -> bool {
        self.sections
            .windows(2)
            .all(|w| w[0].arrival().name() == w[1].start().name())
    }

    /// Names of the stations visited, start first.
    pub fn station_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .sections
            .first()
            .map(|s| vec![s.start().name()])
            .unwrap_or_default();
        names.extend(self.sections.iter().map(|s| s.arrival().name()));
        names
    }
}
