//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds an unusable value
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Configuration for the connection server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port to listen on.
    pub port: u16,

    /// Number of worker tasks, and so of connections served at once.
    pub pool_size: usize,

    /// Listen backlog for connections not yet accepted.
    pub backlog: u32,

    /// Accepted connections waiting for a free worker.
    pub queue_capacity: usize,

    /// How long in-flight connections may continue after shutdown starts.
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7878,
            pool_size: 10,
            backlog: 3,
            queue_capacity: 32,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `TRANSIT_PORT`, `TRANSIT_POOL_SIZE`,
    /// `TRANSIT_BACKLOG`, `TRANSIT_QUEUE` and `TRANSIT_GRACE_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            port: read(&lookup, "TRANSIT_PORT", defaults.port)?,
            pool_size: read_positive(&lookup, "TRANSIT_POOL_SIZE", defaults.pool_size)?,
            backlog: read_positive(&lookup, "TRANSIT_BACKLOG", defaults.backlog)?,
            queue_capacity: read_positive(&lookup, "TRANSIT_QUEUE", defaults.queue_capacity)?,
            shutdown_grace: Duration::from_secs(read(
                &lookup,
                "TRANSIT_GRACE_SECS",
                defaults.shutdown_grace.as_secs(),
            )?),
        };
        Ok(config)
    }

    /// Address to listen on: every interface, on the configured port.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn read<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            value,
            reason: "not a number",
        }),
    }
}

fn read_positive<T: FromStr + PartialEq + Default>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let value = read(lookup, var, default)?;
    if value == T::default() {
        return Err(ConfigError::Invalid {
            var,
            value: "0".to_string(),
            reason: "must be at least 1",
        });
    }
    Ok(value)
}
