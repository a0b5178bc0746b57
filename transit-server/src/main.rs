use std::error::Error;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use transit_server::loader::load_plan;
use transit_server::planner::SearchConfig;
use transit_server::server::admin::Console;
use transit_server::server::{Server, ServerConfig, ServerState};

const TOPOLOGY_VAR: &str = "TRANSIT_TOPOLOGY";
const SCHEDULE_VAR: &str = "TRANSIT_SCHEDULE";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logger()?;

    let config = ServerConfig::from_env()?;
    let topology: PathBuf = std::env::var_os(TOPOLOGY_VAR)
        .ok_or_else(|| format!("{TOPOLOGY_VAR} is not set"))?
        .into();
    let schedule: Option<PathBuf> = std::env::var_os(SCHEDULE_VAR).map(Into::into);

    let plan = load_plan(&topology, schedule.as_deref())?;
    info!(
        topology = %topology.display(),
        stations = plan.station_count(),
        sections = plan.section_count(),
        lines = plan.line_count(),
        "plan loaded"
    );

    let state = ServerState::new(plan, SearchConfig::default());
    let server = Server::bind(config.bind_addr(), config, state.clone()).await?;

    tokio::spawn(console(state.clone()));

    let on_signal = state.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupted");
                on_signal.request_shutdown();
            }
            Err(e) => warn!(error = %e, "cannot listen for ctrl-c"),
        }
    });

    server.run().await?;
    Ok(())
}

fn init_logger() -> Result<(), Box<dyn Error>> {
    let default_level = LevelFilter::INFO;
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()?;
    Ok(())
}

/// Read operator commands from stdin until it closes.
async fn console(state: ServerState) {
    let console = Console::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "cannot read stdin");
                break;
            }
        };
        // Loads read files synchronously.
        let result = tokio::task::block_in_place(|| console.execute(&state, &line));
        match result {
            Ok(out) if out.is_empty() => {}
            Ok(out) => println!("{out}"),
            Err(e) => {
                error!(error = %e, "admin command failed");
                eprintln!("{e}");
            }
        }
    }
}
