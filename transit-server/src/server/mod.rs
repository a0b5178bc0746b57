//! Line-protocol TCP server.
//!
//! The accept loop feeds connections into a bounded queue drained by a fixed
//! pool of workers. A worker keeps one connection until the client leaves,
//! then takes the next from the queue. Clients beyond the pool size wait in
//! the queue, then in the listen backlog.

pub mod admin;
mod config;
mod connection;
mod dto;
mod protocol;
mod snapshot;
mod state;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub use config::{ConfigError, ServerConfig};
pub use connection::{handle_line, serve_connection};
pub use dto::{ErrorKind, Response, SectionDto, StationDto};
pub use protocol::{ProtocolError, Request};
pub use snapshot::LivePlan;
pub use state::ServerState;

type Queue = Arc<Mutex<mpsc::Receiver<(TcpStream, SocketAddr)>>>;

/// A bound server, ready to run.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    state: ServerState,
}

impl Server {
    /// Bind `addr` with the configured backlog.
    pub async fn bind(
        addr: SocketAddr,
        config: ServerConfig,
        state: ServerState,
    ) -> io::Result<Self> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(config.backlog)?;
        Ok(Self {
            listener,
            config,
            state,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until [`ServerState::request_shutdown`] is called.
    ///
    /// On shutdown, accepting stops and workers get the configured grace
    /// period to finish their connections before they are aborted.
    pub async fn run(self) -> io::Result<()> {
        let Server {
            listener,
            config,
            state,
        } = self;
        let addr = listener.local_addr()?;
        info!(
            %addr,
            workers = config.pool_size,
            backlog = config.backlog,
            "listening"
        );

        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity);
        let queue: Queue = Arc::new(Mutex::new(queue_rx));
        let mut workers = JoinSet::new();
        for id in 0..config.pool_size {
            workers.spawn(worker(id, queue.clone(), state.clone()));
        }

        let mut shutdown = state.shutdown_signal();
        loop {
            let (stream, peer) = tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                        continue;
                    }
                },
            };
            debug!(%peer, "accepted");
            tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,
                sent = queue_tx.send((stream, peer)) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }

        info!("shutting down");
        drop(queue_tx);
        let drained = tokio::time::timeout(config.shutdown_grace, async {
            while workers.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(remaining = workers.len(), "grace period over, aborting workers");
            workers.shutdown().await;
        }
        drop(listener);
        info!("stopped");
        Ok(())
    }
}

async fn worker(id: usize, queue: Queue, state: ServerState) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some((stream, peer)) = next else {
            break;
        };
        let (read, write) = stream.into_split();
        match serve_connection(BufReader::new(read), write, &state).await {
            Ok(requests) => debug!(worker = id, %peer, requests, "disconnected"),
            Err(e) => warn!(worker = id, %peer, error = %e, "connection failed"),
        }
    }
    debug!(worker = id, "worker done");
}
