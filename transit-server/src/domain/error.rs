//! Domain error types.
//!
//! These errors represent validation failures while building or updating a
//! plan. They are distinct from I/O and protocol errors.

use super::{InvalidStation, LineId};

/// Domain-level errors for plan construction and schedule merging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A station record failed validation
    #[error(transparent)]
    Station(#[from] InvalidStation),

    /// A schedule names a line the plan does not contain
    #[error("line {0} does not exist in the plan")]
    UndefinedLine(LineId),

    /// A schedule names a start station no section of the line leaves from
    #[error("station {station} is not on line {line}")]
    StartStationNotFound { station: String, line: LineId },

    /// A schedule gives a second, different start station for a line
    #[error("line {line} has several start stations: {current} and {requested}")]
    DifferentStart {
        line: LineId,
        current: String,
        requested: String,
    },
}
