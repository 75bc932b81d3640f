use super::connection::{ConnectionError, handle_connection};
use crate::dispatch::dispatcher::Dispatcher;
use crate::dispatch::types::DispatchError;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tracing::Instrument;
use uuid::Uuid;

/// Pause after a failed accept, so a persistent error (e.g. fd exhaustion)
/// does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// TCP front end: one spawned task per accepted connection.
pub struct Server {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
}

impl Server {
    pub async fn bind(addr: SocketAddr, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            dispatcher,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever. Accept errors are logged and retried;
    /// they never stop the server.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);

        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let dispatcher = self.dispatcher.clone();
                    let span = tracing::info_span!("conn", id = %Uuid::new_v4(), %peer);
                    tokio::spawn(serve(stream, dispatcher).instrument(span));
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}

async fn serve(mut stream: TcpStream, dispatcher: Arc<Dispatcher>) {
    match handle_connection(&mut stream, &dispatcher).await {
        Ok(()) => tracing::debug!("Reply sent"),
        Err(ConnectionError::Dispatch(DispatchError::NoPathFound)) => {
            tracing::info!("No path found; closing without reply");
        }
        Err(ConnectionError::Dispatch(DispatchError::BadRequest(reason))) => {
            tracing::warn!("Bad request: {}", reason);
        }
        Err(e) => {
            tracing::error!("Connection failed: {}", e);
        }
    }
}

/// Log dispatcher counters every `period`.
pub fn spawn_stats_reporter(dispatcher: Arc<Dispatcher>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;

        loop {
            interval.tick().await;
            let stats = dispatcher.stats();
            tracing::info!(
                "Dispatch stats: {} requests, {} cache hits, {} solves, {} joined, {} failed, {} cached, {} in flight",
                stats.requests,
                stats.cache_hits,
                stats.solves,
                stats.joined,
                stats.failures,
                dispatcher.cache().len(),
                dispatcher.in_flight_count()
            );
        }
    })
}
