//! Data transfer objects for responses.
//!
//! Every response is one JSON object on one line, tagged by `status`.

use serde::{Deserialize, Serialize};

use crate::domain::{Route, Section, Station};
use crate::planner::{Itinerary, SearchError};

use super::protocol::ProtocolError;

/// A response to one request line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    Route {
        sections: Vec<SectionDto>,

        /// Meters
        total_distance: f64,

        /// Seconds of travel, excluding waits
        total_duration: u32,

        /// Arrival time, for journeys
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arrival: Option<String>,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

/// Category of an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Protocol,
    NotImplemented,
}

/// One section of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDto {
    pub start: StationDto,
    pub arrival: StationDto,
    pub distance: f64,
    pub duration: u32,

    /// Line id; absent for walking transfers
    pub line: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDto {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl From<&Station> for StationDto {
    fn from(station: &Station) -> Self {
        let coord = station.coord();
        Self {
            name: station.name().to_string(),
            x: coord.x,
            y: coord.y,
        }
    }
}

impl From<&Section> for SectionDto {
    fn from(section: &Section) -> Self {
        Self {
            start: section.start().as_ref().into(),
            arrival: section.arrival().as_ref().into(),
            distance: section.distance(),
            duration: section.duration(),
            line: section.line().map(ToString::to_string),
        }
    }
}

impl Response {
    pub fn route(route: &Route) -> Self {
        Response::Route {
            sections: route.sections().iter().map(|s| s.as_ref().into()).collect(),
            total_distance: route.total_distance(),
            total_duration: route.total_duration(),
            arrival: None,
        }
    }

    /// A route with its arrival time, `+Nd` marking later days.
    pub fn journey(itinerary: &Itinerary) -> Self {
        let mut response = Self::route(&itinerary.route);
        if let Response::Route { arrival, .. } = &mut response {
            *arrival = Some(match itinerary.days_later {
                0 => itinerary.arrival.to_string(),
                days => format!("{}+{days}d", itinerary.arrival),
            });
        }
        response
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Response::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn not_implemented(command: &str) -> Self {
        Self::error(ErrorKind::NotImplemented, format!("{command} is not implemented"))
    }
}

impl From<SearchError> for Response {
    fn from(err: SearchError) -> Self {
        let kind = match err {
            SearchError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SearchError::NotFound { .. } => ErrorKind::NotFound,
        };
        Self::error(kind, err.to_string())
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Self::error(ErrorKind::Protocol, err.to_string())
    }
}
