//! Configuration Module
//!
//! Cache options, loadable from environment variables or any serde source.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default capacity when none is configured.
pub const DEFAULT_MAX_SIZE: usize = 1024;

/// Default sweeper tick in milliseconds.
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 100;

/// Cache construction parameters.
///
/// `max_size` must be non-zero; [`crate::Cache::new`] rejects zero with
/// [`crate::CacheError::MaxSizeIsZero`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Fixed number of slots the cache can hold
    pub max_size: usize,
    /// Whether a successful `get` restarts the entry's expiry clock
    pub refresh_ttl: bool,
    /// Background sweeper tick in milliseconds
    pub sweep_interval_ms: u64,
}

impl CacheOptions {
    /// Creates options with the given capacity and defaults elsewhere.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    /// Creates options by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Slot capacity (default: 1024)
    /// - `CACHE_REFRESH_TTL` - `true` to refresh TTL on read (default: false)
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweeper tick in ms (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size),
            refresh_ttl: env::var("CACHE_REFRESH_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_ttl),
            sweep_interval_ms: env::var("CACHE_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval_ms),
        }
    }

    pub fn with_refresh_ttl(mut self, refresh_ttl: bool) -> Self {
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sweeper tick. A zero interval falls back to the default.
    pub fn sweep_interval(&self) -> Duration {
        match self.sweep_interval_ms {
            0 => Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
            ms => Duration::from_millis(ms),
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            refresh_ttl: false,
            sweep_interval_ms: DEFAULT_SWEEP_INTERVAL_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let options = CacheOptions::default();
        assert_eq!(options.max_size, 1024);
        assert!(!options.refresh_ttl);
        assert_eq!(options.sweep_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_options_from_env() {
        env::set_var("CACHE_MAX_SIZE", "64");
        env::set_var("CACHE_REFRESH_TTL", "true");
        env::set_var("CACHE_SWEEP_INTERVAL_MS", "not-a-number");

        let options = CacheOptions::from_env();
        assert_eq!(options.max_size, 64);
        assert!(options.refresh_ttl);
        assert_eq!(options.sweep_interval_ms, DEFAULT_SWEEP_INTERVAL_MS);

        env::remove_var("CACHE_MAX_SIZE");
        env::remove_var("CACHE_REFRESH_TTL");
        env::remove_var("CACHE_SWEEP_INTERVAL_MS");

        assert_eq!(CacheOptions::from_env(), CacheOptions::default());
    }

    #[test]
    fn test_options_builder() {
        let options = CacheOptions::new(8)
            .with_refresh_ttl(true)
            .with_sweep_interval(Duration::from_millis(250));
        assert_eq!(options.max_size, 8);
        assert!(options.refresh_ttl);
        assert_eq!(options.sweep_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_zero_sweep_interval_uses_default() {
        let options = CacheOptions::new(8).with_sweep_interval(Duration::ZERO);
        assert_eq!(options.sweep_interval(), Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS));
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: CacheOptions = serde_json::from_str(r#"{"max_size": 16}"#).unwrap();
        assert_eq!(options.max_size, 16);
        assert!(!options.refresh_ttl);
        assert_eq!(options.sweep_interval_ms, DEFAULT_SWEEP_INTERVAL_MS);
    }
}
