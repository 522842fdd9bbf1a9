//! Cache Module
//!
//! Fixed-capacity in-memory caching with TTL expiration and tail-slot
//! eviction over a preallocated slot ring.

mod entry;
mod ring;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use shared::{Cache, WeakCache};
pub use stats::CacheStats;
pub use store::{sweep_window_len, CacheStore};
