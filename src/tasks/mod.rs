//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Sweeper: removes expired entries a bounded window of slots at a time

mod sweeper;

pub use sweeper::spawn_sweeper;
