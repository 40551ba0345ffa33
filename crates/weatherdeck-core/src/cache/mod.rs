//! Local response cache.
//!
//! This module provides the `CacheManager` for storing provider responses
//! on disk. Entries are keyed by schema version, day, provider mode
//! (mock/live), endpoint and query, so a repeated lookup on the same day is
//! served without a network call. Keys roll over at midnight; old entries
//! are simply never read again (there is no eviction).

pub mod manager;

pub use manager::{CacheManager, CachedData, Endpoint};
