//! Operator commands for a running server.
//!
//! Commands are looked up by name in a registry. Each has a usage line, a
//! description and a handler taking the console it was run from, the server
//! state and the arguments after the command name.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::loader::LoadError;

use super::state::ServerState;

/// Error from an operator command.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown command: {0} (try help)")]
    UnknownCommand(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type Handler = fn(&Console, &ServerState, &[&str]) -> Result<String, AdminError>;

/// A registered operator command.
#[derive(Debug, Clone, Copy)]
pub struct AdminCommand {
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: Handler,
}

const COMMANDS: &[(&str, AdminCommand)] = &[
    (
        "reload",
        AdminCommand {
            usage: "reload <topology.csv>",
            description: "replace the plan with a freshly loaded topology",
            handler: reload,
        },
    ),
    (
        "schedule",
        AdminCommand {
            usage: "schedule <schedule.csv>",
            description: "merge departure times into the current plan",
            handler: schedule,
        },
    ),
    (
        "status",
        AdminCommand {
            usage: "status",
            description: "show the plan being served",
            handler: status,
        },
    ),
    (
        "help",
        AdminCommand {
            usage: "help",
            description: "list commands",
            handler: help,
        },
    ),
    (
        "stop",
        AdminCommand {
            usage: "stop",
            description: "stop the server",
            handler: stop,
        },
    ),
];

/// Registry of operator commands.
#[derive(Debug, Clone)]
pub struct Console {
    commands: BTreeMap<&'static str, AdminCommand>,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            commands: COMMANDS.iter().copied().collect(),
        }
    }
}

impl Console {
    /// A console with the built-in commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a command.
    pub fn register(&mut self, name: &'static str, command: AdminCommand) {
        self.commands.insert(name, command);
    }

    pub fn commands(&self) -> impl Iterator<Item = (&'static str, &AdminCommand)> {
        self.commands.iter().map(|(name, command)| (*name, command))
    }

    /// One line per registered command: usage, then description.
    pub fn usage(&self) -> String {
        let width = self
            .commands()
            .map(|(_, command)| command.usage.len())
            .max()
            .unwrap_or(0);
        let lines: Vec<String> = self
            .commands()
            .map(|(_, command)| format!("{:width$}  {}", command.usage, command.description))
            .collect();
        lines.join("\n")
    }

    /// Run one line of operator input. Blank lines do nothing.
    pub fn execute(&self, state: &ServerState, line: &str) -> Result<String, AdminError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(String::new());
        };
        let args: Vec<&str> = words.collect();
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| AdminError::UnknownCommand(name.to_string()))?;
        info!(command = name, ?args, "admin command");
        (command.handler)(self, state, &args)
    }
}

fn reload(_: &Console, state: &ServerState, args: &[&str]) -> Result<String, AdminError> {
    let [path] = args else {
        return Err(AdminError::Usage("reload <topology.csv>"));
    };
    let version = state.plan.reload_topology(Path::new(path))?;
    Ok(format!("plan v{version} loaded from {path}"))
}

fn schedule(_: &Console, state: &ServerState, args: &[&str]) -> Result<String, AdminError> {
    let [path] = args else {
        return Err(AdminError::Usage("schedule <schedule.csv>"));
    };
    let version = state.plan.merge_schedule(Path::new(path))?;
    Ok(format!("plan v{version}: schedule {path} merged"))
}

fn status(_: &Console, state: &ServerState, args: &[&str]) -> Result<String, AdminError> {
    if !args.is_empty() {
        return Err(AdminError::Usage("status"));
    }
    let plan = state.plan.current();
    let scheduled = plan.lines().filter(|line| line.is_scheduled()).count();
    Ok(format!(
        "plan v{}: {} stations, {} sections, {} lines ({} scheduled){}",
        state.plan.version(),
        plan.station_count(),
        plan.section_count(),
        plan.line_count(),
        scheduled,
        if state.is_shutting_down() { ", stopping" } else { "" },
    ))
}

fn help(console: &Console, _: &ServerState, _: &[&str]) -> Result<String, AdminError> {
    Ok(console.usage())
}

fn stop(_: &Console, state: &ServerState, args: &[&str]) -> Result<String, AdminError> {
    if !args.is_empty() {
        return Err(AdminError::Usage("stop"));
    }
    state.request_shutdown();
    Ok("stopping".to_string())
}
