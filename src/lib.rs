//! TTL Ring Cache - A fixed-capacity in-process cache
//!
//! Stores up to N entries in a preallocated slot ring with per-entry TTL.
//! Expired slots are recycled before any live entry is evicted, and a
//! background sweeper removes expired entries a few slots at a time.
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//! use ttl_ring_cache::{Cache, CacheOptions};
//!
//! # async fn run() -> ttl_ring_cache::error::Result<()> {
//! let (tx, rx) = tokio::sync::oneshot::channel::<()>();
//! let options = CacheOptions::new(1024).with_refresh_ttl(true);
//! let (cache, sweeper) = Cache::start(options, async move {
//!     let _ = rx.await;
//! })?;
//!
//! cache.set("session", 42u64, Duration::from_secs(30));
//! assert_eq!(cache.get("session"), Some(42));
//!
//! let _ = tx.send(());
//! let _ = sweeper.await;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats, WeakCache};
pub use config::CacheOptions;
pub use error::CacheError;
pub use tasks::spawn_sweeper;
