//! Expiration Sweeper Task
//!
//! Background task that periodically removes expired cache entries, a
//! bounded window of slots at a time.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace};

use crate::cache::Cache;

/// Spawns a background task that sweeps `cache` every `interval`.
///
/// Each tick runs [`Cache::sweep`], which repeats immediately while passes
/// keep finding dense runs of expired entries. The task holds only a weak
/// reference to the cache.
///
/// # Arguments
/// * `cache` - Cache to sweep
/// * `interval` - Time between ticks
/// * `shutdown` - Future that stops the task when it resolves
///
/// # Returns
/// A JoinHandle that completes once the task has stopped, either because
/// `shutdown` resolved or because every `Cache` handle was dropped.
///
/// # Example
/// ```ignore
/// let (tx, rx) = tokio::sync::oneshot::channel::<()>();
/// let handle = spawn_sweeper(&cache, Duration::from_millis(100), async move {
///     let _ = rx.await;
/// });
/// // Later, during shutdown:
/// let _ = tx.send(());
/// handle.await?;
/// ```
pub fn spawn_sweeper<V, F>(cache: &Cache<V>, interval: Duration, shutdown: F) -> JoinHandle<()>
where
    V: Send + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let weak = cache.downgrade();
    let interval = interval.max(Duration::from_millis(1));

    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting expiration sweeper");

        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Expiration sweeper received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let Some(cache) = weak.upgrade() else {
                info!("Cache dropped, stopping expiration sweeper");
                break;
            };

            let removed = cache.sweep();
            if removed > 0 {
                debug!(removed, remaining = cache.len(), "Sweep removed expired entries");
            } else {
                trace!("Sweep found no expired entries");
            }
        }
    })
}
