//! Transit journey planner server.
//!
//! Answers "how do I get from this station to that one?" over a line
//! protocol, against a transit network that operators can reload or
//! reschedule while queries are being served.

pub mod domain;
pub mod loader;
pub mod planner;
pub mod server;
