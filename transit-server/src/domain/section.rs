//! Sections (directed edges) and line identifiers.

use std::fmt;
use std::sync::Arc;

use super::Station;

/// A line name plus its variant, e.g. line `8` variant `1`.
///
/// Sources write these as `"<name> variant <variant>"`.
///
/// ```
/// use transit_server::domain::LineId;
///
/// let id = LineId::parse("8 variant 1");
/// assert_eq!(id.name(), "8");
/// assert_eq!(id.variant(), "1");
/// assert_eq!(id.to_string(), "8 variant 1");
///
/// let bare = LineId::parse("RER B");
/// assert_eq!(bare.name(), "RER B");
/// assert_eq!(bare.variant(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId {
    name: String,
    variant: String,
}

impl LineId {
    pub fn new(name: &str, variant: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            variant: variant.trim().to_string(),
        }
    }

    /// Parse `"<name> variant <variant>"`; anything else is a bare name.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.rsplit_once(" variant ") {
            Some((name, variant)) => Self::new(name, variant),
            None => Self::new(s, ""),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.variant.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} variant {}", self.name, self.variant)
        }
    }
}

/// A directed edge between two stations.
///
/// Sections are immutable. A section without a line is a walking transfer
/// synthesized during a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    start: Arc<Station>,
    arrival: Arc<Station>,
    distance: f64,
    duration: u32,
    line: Option<LineId>,
}

impl Section {
    /// Create a section served by a line.
    ///
    /// Negative or non-finite distances are clamped to zero.
    pub fn new(
        start: Arc<Station>,
        arrival: Arc<Station>,
        distance: f64,
        duration: u32,
        line: LineId,
    ) -> Self {
        Self {
            start,
            arrival,
            distance: sanitize_distance(distance),
            duration,
            line: Some(line),
        }
    }

    /// Create a walking section between two stations.
    pub fn walking(start: Arc<Station>, arrival: Arc<Station>) -> Self {
        let distance = start.distance_to(&arrival);
        let duration = start.walk_duration_to(&arrival);
        Self {
            start,
            arrival,
            distance: sanitize_distance(distance),
            duration,
            line: None,
        }
    }

    pub fn start(&self) -> &Arc<Station> {
        &self.start
    }

    pub fn arrival(&self) -> &Arc<Station> {
        &self.arrival
    }

    /// Length in meters.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Nominal duration in seconds.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn line(&self) -> Option<&LineId> {
        self.line.as_ref()
    }

    pub fn is_walking(&self) -> bool {
        self.line.is_none()
    }
}

fn sanitize_distance(distance: f64) -> f64 {
    if distance.is_finite() && distance > 0.0 {
        distance
    } else {
        0.0
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some(line) => write!(
                f,
                "{} -> {} [{line}]",
                self.start.name(),
                self.arrival.name()
            ),
            None => write!(f, "{} -> {} [walk]", self.start.name(), self.arrival.name()),
        }
    }
}
