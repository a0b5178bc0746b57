//! Request line parsing.
//!
//! A request is one line of `;`-separated fields; the first names the
//! command:
//!
//! ```text
//! ROUTE;<start>;<arrival>
//! JOURNEY;<start>;<arrival>;<hh:mm>;<distance|duration>;<walk|nowalk>
//! SEARCH;<partial name>
//! ```
//!
//! Command names are matched case-insensitively. Station names are passed
//! through to the planner, which trims them and rejects empty ones.

use crate::domain::TimeOfDay;
use crate::planner::{Optimize, RouteRequest};

/// Error from parsing a request line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("missing argument for {command}")]
    MissingArgument { command: &'static str },

    #[error("unexpected argument for {command}")]
    UnexpectedArgument { command: &'static str },

    /// A field is present but cannot be read
    #[error("invalid {field} {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("request is not valid UTF-8")]
    InvalidEncoding,

    #[error("request longer than {limit} bytes")]
    LineTooLong { limit: usize },
}

/// A parsed client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Distance-optimised route, no walking, leaving at midnight.
    Route(RouteRequest),

    /// Route with explicit departure, mode and walking flag.
    Journey(RouteRequest),

    /// Station name lookup.
    Search(String),
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(';').collect();
        let command = fields[0].trim();

        if command.eq_ignore_ascii_case("ROUTE") {
            let [start, arrival] = arguments::<2>("ROUTE", &fields)?;
            Ok(Request::Route(RouteRequest::new(start, arrival)))
        } else if command.eq_ignore_ascii_case("JOURNEY") {
            let [start, arrival, time, mode, walking] = arguments::<5>("JOURNEY", &fields)?;
            let departure = TimeOfDay::parse(time).map_err(|_| invalid("time", time))?;
            let optimize: Optimize = mode.parse().map_err(|_| invalid("mode", mode))?;
            let walking = match walking.trim() {
                w if w.eq_ignore_ascii_case("walk") => true,
                w if w.eq_ignore_ascii_case("nowalk") => false,
                _ => return Err(invalid("walking flag", walking)),
            };
            Ok(Request::Journey(
                RouteRequest::new(start, arrival)
                    .departing_at(departure)
                    .optimize(optimize)
                    .walking(walking),
            ))
        } else if command.eq_ignore_ascii_case("SEARCH") {
            let [name] = arguments::<1>("SEARCH", &fields)?;
            if name.trim().is_empty() {
                return Err(ProtocolError::MissingArgument { command: "SEARCH" });
            }
            Ok(Request::Search(name.trim().to_string()))
        } else {
            Err(ProtocolError::UnknownCommand(command.to_string()))
        }
    }

    /// Command name, for logging.
    pub fn command(&self) -> &'static str {
        match self {
            Request::Route(_) => "ROUTE",
            Request::Journey(_) => "JOURNEY",
            Request::Search(_) => "SEARCH",
        }
    }
}

/// The `N` fields after the command, or a field count error.
fn arguments<'a, const N: usize>(
    command: &'static str,
    fields: &[&'a str],
) -> Result<[&'a str; N], ProtocolError> {
    let args = &fields[1..];
    if args.len() < N {
        return Err(ProtocolError::MissingArgument { command });
    }
    args.try_into()
        .map_err(|_| ProtocolError::UnexpectedArgument { command })
}

fn invalid(field: &'static str, value: &str) -> ProtocolError {
    ProtocolError::InvalidField {
        field,
        value: value.trim().to_string(),
    }
}
