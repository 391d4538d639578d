//! In-process caching
//!
//! - `region`: Change tokens that expire every entry of a domain at once
//! - `memory_cache`: Shared key/value cache with single-flight population

pub mod memory_cache;
pub mod region;

pub use memory_cache::{cache_key, PlatformMemoryCache};
pub use region::CacheRegion;
