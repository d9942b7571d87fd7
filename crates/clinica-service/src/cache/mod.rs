//! Caching infrastructure for the service layer.
//!
//! This module provides the cache port: a byte-oriented key/value abstraction
//! with TTL expiry and glob pattern deletes, a Redis implementation, and a
//! disabled no-op variant for when caching is turned off or unreachable.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::{RedisCacheService, DEFAULT_ENTRY_TTL, DEFAULT_LIST_TTL};
