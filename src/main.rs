use maze_server::config::Config;
use maze_server::dispatch::dispatcher::Dispatcher;
use maze_server::search::solver::Solver;
use maze_server::server::listener::{Server, spawn_stats_reporter};
use maze_server::storage::cache::ResultCache;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // .with_max_level(tracing::Level::DEBUG)
        .with_max_level(tracing::Level::INFO)
        .init();

    // Anything but a single port argument is a silent no-op.
    let Some(config) = Config::from_env() else {
        std::process::exit(0);
    };

    tracing::info!(
        "Starting maze server on port {} (algorithm: {}, cache: {})",
        config.port,
        config.algorithm,
        config.cache_path.display()
    );

    // 1. Result cache:
    let cache = Arc::new(ResultCache::open(&config.cache_path)?);

    // 2. Solver and dispatcher:
    let solver = Arc::new(Solver::new(config.algorithm));
    let dispatcher = Dispatcher::new(cache, solver);

    // 3. Spawn stats reporter:
    spawn_stats_reporter(dispatcher.clone(), Duration::from_secs(30));

    // 4. Start TCP server:
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let server = Server::bind(addr, dispatcher).await?;

    tracing::info!("Press Ctrl+C to shutdown");

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    Ok(())
}
