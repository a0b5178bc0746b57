//! Shared server state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::Plan;
use crate::planner::SearchConfig;

use super::snapshot::LivePlan;

/// State shared by the workers and the admin console.
#[derive(Clone)]
pub struct ServerState {
    /// The plan being served
    pub plan: Arc<LivePlan>,

    /// Route search configuration
    pub search: Arc<SearchConfig>,

    shutdown: Arc<watch::Sender<bool>>,
}

impl ServerState {
    /// Create a new server state.
    pub fn new(plan: Plan, search: SearchConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            plan: Arc::new(LivePlan::new(plan)),
            search: Arc::new(search),
            shutdown: Arc::new(shutdown),
        }
    }

    /// Ask the server to stop accepting connections and wind down.
    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    pub(crate) fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}
