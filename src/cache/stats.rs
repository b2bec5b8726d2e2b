//! Cache Statistics Module
//!
//! Tracks store-wide operation counters and snapshot totals.

use serde::Serialize;

// == Store Stats ==
/// Monotonically increasing operation counters.
///
/// Counters only reset with the process; reads take a snapshot copy.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Number of reads served from the cache
    pub cache_hits: u64,
    /// Number of reads that fell through to the backing store
    pub cache_misses: u64,
    /// Number of insert/upsert calls
    pub inserts: u64,
    /// Number of records persisted by flushes
    pub flushes: u64,
    /// Number of entries removed by idle eviction
    pub evictions: u64,
}

impl StoreStats {
    // == Constructor ==
    /// Creates a new StoreStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    /// Increments the cache-hit counter.
    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    // == Record Miss ==
    /// Increments the cache-miss counter.
    pub fn record_miss(&mut self) {
        self.cache_misses += 1;
    }

    // == Record Insert ==
    /// Increments the insert counter.
    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    // == Record Flush ==
    /// Adds a flushed batch size to the flushed-record counter.
    pub fn record_flush(&mut self, records: usize) {
        self.flushes += records as u64;
    }

    // == Record Evictions ==
    /// Adds an eviction pass result to the eviction counter.
    pub fn record_evictions(&mut self, evicted: usize) {
        self.evictions += evicted as u64;
    }

    // == Snapshot ==
    /// Builds a snapshot combining the counters with derived totals.
    pub fn snapshot(
        &self,
        cached_records: usize,
        dirty_records: usize,
        tables: usize,
    ) -> StatsSnapshot {
        StatsSnapshot {
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            inserts: self.inserts,
            flushes: self.flushes,
            evictions: self.evictions,
            cached_records,
            dirty_records,
            tables,
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time view of the store: counters plus derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    /// Number of reads served from the cache
    pub cache_hits: u64,
    /// Number of reads that fell through to the backing store
    pub cache_misses: u64,
    /// Number of insert/upsert calls
    pub inserts: u64,
    /// Number of records persisted by flushes
    pub flushes: u64,
    /// Number of entries removed by idle eviction
    pub evictions: u64,
    /// Entries currently cached across all tables
    pub cached_records: usize,
    /// Keys currently pending flush across all tables
    pub dirty_records: usize,
    /// Number of registered tables
    pub tables: usize,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StoreStats::new();
        assert_eq!(stats.cache_hits, 0);
        assert_eq!(stats.cache_misses, 0);
        assert_eq!(stats.inserts, 0);
        assert_eq!(stats.flushes, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_record_hit_and_miss() {
        let mut stats = StoreStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.cache_misses, 1);
    }

    #[test]
    fn test_record_flush_counts_records() {
        let mut stats = StoreStats::new();
        stats.record_flush(3);
        stats.record_flush(2);

        assert_eq!(stats.flushes, 5);
    }

    #[test]
    fn test_record_evictions() {
        let mut stats = StoreStats::new();
        stats.record_evictions(4);
        stats.record_evictions(0);

        assert_eq!(stats.evictions, 4);
    }

    #[test]
    fn test_snapshot_combines_totals() {
        let mut stats = StoreStats::new();
        stats.record_insert();
        stats.record_hit();

        let snapshot = stats.snapshot(7, 2, 3);

        assert_eq!(snapshot.inserts, 1);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.cached_records, 7);
        assert_eq!(snapshot.dirty_records, 2);
        assert_eq!(snapshot.tables, 3);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = StoreStats::new().snapshot(0, 0, 0);
        let json = serde_json::to_string(&snapshot).unwrap();

        assert!(json.contains("cache_hits"));
        assert!(json.contains("dirty_records"));
        assert!(json.contains("tables"));
    }
}
