//! Ticker demo
//!
//! Fills a cache with short-lived entries on a timer and logs the counters
//! while the sweeper keeps the ring clean. Stops on Ctrl+C or SIGTERM.
//!
//! Run with `RUST_LOG=ttl_ring_cache=debug cargo run --example ticker`.

use std::time::Duration;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_ring_cache::{Cache, CacheOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticker=info,ttl_ring_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = CacheOptions::from_env();
    info!(
        max_size = options.max_size,
        refresh_ttl = options.refresh_ttl,
        sweep_interval_ms = options.sweep_interval_ms,
        "Configuration loaded"
    );

    let (cache, sweeper) = Cache::<u64>::start(options, shutdown_signal())?;

    let mut writes = tokio::time::interval(Duration::from_millis(10));
    let mut report = tokio::time::interval(Duration::from_secs(1));
    let mut n: u64 = 0;

    tokio::pin!(sweeper);
    loop {
        tokio::select! {
            result = &mut sweeper => {
                result?;
                break;
            }
            _ = writes.tick() => {
                // Every tenth key lives forever, the rest expire quickly
                let ttl = if n % 10 == 0 {
                    Duration::ZERO
                } else {
                    Duration::from_millis(200 + n % 300)
                };
                cache.set(format!("key:{n}"), n, ttl);
                n += 1;
            }
            _ = report.tick() => {
                let stats = cache.stats();
                info!(
                    entries = stats.total_entries,
                    capacity = stats.capacity,
                    expirations = stats.expirations,
                    evictions = stats.evictions,
                    "Cache stats"
                );
            }
        }
    }

    info!(stats = ?cache.stats(), "Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
