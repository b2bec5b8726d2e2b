//! Cache Module
//!
//! Provides the write-back record cache: per-table entry storage with dirty
//! tracking, the engine orchestrating flushes and eviction, and operation
//! statistics.

mod engine;
mod entry;
mod stats;
mod table;


// Re-export public types
pub use engine::CacheEngine;
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::{StatsSnapshot, StoreStats};
pub use table::TableCache;

// == Public Types ==
/// A record payload: arbitrary JSON object data.
pub type Record = serde_json::Map<String, serde_json::Value>;

// == Public Constants ==
/// Reserved field under which query results carry each row's key.
pub const KEY_FIELD: &str = "_key";
