//! Response DTOs for the record store API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{Record, StatsSnapshot};

/// Response body for record retrieval (GET /records/:table/:key)
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    /// The requested key
    pub key: String,
    /// The stored record
    pub data: Record,
}

impl RecordResponse {
    /// Creates a new RecordResponse
    pub fn new(key: impl Into<String>, data: Record) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }
}

/// Response body for record insertion (PUT /records/:table/:key)
#[derive(Debug, Clone, Serialize)]
pub struct InsertResponse {
    /// Success message
    pub message: String,
    /// The table written to
    pub table: String,
    /// The key that was written
    pub key: String,
}

impl InsertResponse {
    /// Creates a new InsertResponse
    pub fn new(table: impl Into<String>, key: impl Into<String>) -> Self {
        let table = table.into();
        let key = key.into();
        Self {
            message: format!("Record '{}' stored in '{}'", key, table),
            table,
            key,
        }
    }
}

/// Response body for table creation (POST /tables)
#[derive(Debug, Clone, Serialize)]
pub struct CreateTableResponse {
    /// Success message
    pub message: String,
    /// The registered table
    pub table: String,
}

impl CreateTableResponse {
    /// Creates a new CreateTableResponse
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            message: format!("Table '{}' registered", table),
            table,
        }
    }
}

/// Response body for predicate queries (GET /records/:table)
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// Number of rows returned
    pub total: usize,
    /// Matching records, each tagged with its key
    pub records: Vec<Record>,
}

impl QueryResponse {
    /// Creates a new QueryResponse
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            total: records.len(),
            records,
        }
    }
}

/// Response body for manual flush (POST /flush)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    /// Number of records persisted
    pub flushed: usize,
}

/// Response body for manual eviction (POST /evict)
#[derive(Debug, Clone, Serialize)]
pub struct EvictResponse {
    /// Number of entries removed from memory
    pub evicted: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of reads served from the cache
    pub cache_hits: u64,
    /// Number of reads that fell through to the backing store
    pub cache_misses: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
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

impl From<StatsSnapshot> for StatsResponse {
    fn from(snapshot: StatsSnapshot) -> Self {
        let total_reads = snapshot.cache_hits + snapshot.cache_misses;
        let hit_rate = if total_reads > 0 {
            snapshot.cache_hits as f64 / total_reads as f64
        } else {
            0.0
        };
        Self {
            cache_hits: snapshot.cache_hits,
            cache_misses: snapshot.cache_misses,
            hit_rate,
            inserts: snapshot.inserts,
            flushes: snapshot.flushes,
            evictions: snapshot.evictions,
            cached_records: snapshot.cached_records,
            dirty_records: snapshot.dirty_records,
            tables: snapshot.tables,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::StoreStats;
    use serde_json::json;

    #[test]
    fn test_record_response_serialize() {
        let mut data = Record::new();
        data.insert("name".to_string(), json!("alice"));
        let resp = RecordResponse::new("u1", data);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("u1"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_insert_response_serialize() {
        let resp = InsertResponse::new("users", "u1");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("users"));
        assert!(json.contains("u1"));
        assert!(json.contains("stored"));
    }

    #[test]
    fn test_query_response_total() {
        let resp = QueryResponse::new(vec![Record::new(), Record::new()]);
        assert_eq!(resp.total, 2);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let mut stats = StoreStats::new();
        for _ in 0..8 {
            stats.record_hit();
        }
        for _ in 0..2 {
            stats.record_miss();
        }

        let resp = StatsResponse::from(stats.snapshot(5, 1, 2));
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.cached_records, 5);
    }

    #[test]
    fn test_stats_response_zero_reads() {
        let resp = StatsResponse::from(StoreStats::new().snapshot(0, 0, 0));
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
