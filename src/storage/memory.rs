//! In-Memory Gateway Module
//!
//! A map-backed persistence gateway. Stands in for PostgreSQL in tests and
//! embedded deployments where durability is not required; per-operation
//! counters make gateway traffic observable.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::Record;
use crate::error::StoreResult;
use crate::storage::PersistenceGateway;

// == In-Memory Gateway ==
/// Non-durable [`PersistenceGateway`] holding all tables in process memory.
///
/// Predicate queries are not interpreted: an empty predicate returns rows in
/// key order up to the limit, and any non-empty predicate matches nothing.
#[derive(Default)]
pub struct InMemoryGateway {
    tables: Mutex<HashMap<String, BTreeMap<String, Record>>>,
    reads: AtomicU64,
    upserts: AtomicU64,
    queries: AtomicU64,
    creates: AtomicU64,
}

impl InMemoryGateway {
    // == Constructor ==
    /// Creates an empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    // == Call Counters ==
    /// Number of point-read calls served.
    pub fn read_calls(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of batch-upsert calls served.
    pub fn upsert_calls(&self) -> u64 {
        self.upserts.load(Ordering::Relaxed)
    }

    /// Number of query calls served.
    pub fn query_calls(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Number of create-table calls served.
    pub fn create_calls(&self) -> u64 {
        self.creates.load(Ordering::Relaxed)
    }

    /// Number of records currently stored for `table`.
    pub fn stored_len(&self, table: &str) -> usize {
        self.tables
            .lock()
            .expect("gateway table lock poisoned")
            .get(table)
            .map(|t| t.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn create_table(&self, table: &str, _schema: &Value) -> StoreResult<()> {
        self.creates.fetch_add(1, Ordering::Relaxed);
        self.tables
            .lock()
            .expect("gateway table lock poisoned")
            .entry(table.to_string())
            .or_default();
        Ok(())
    }

    async fn read(&self, table: &str, key: &str) -> StoreResult<Option<Record>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .tables
            .lock()
            .expect("gateway table lock poisoned")
            .get(table)
            .and_then(|t| t.get(key))
            .cloned())
    }

    async fn batch_upsert(&self, table: &str, records: &[(String, Record)]) -> StoreResult<()> {
        self.upserts.fetch_add(1, Ordering::Relaxed);
        let mut tables = self.tables.lock().expect("gateway table lock poisoned");
        let stored = tables.entry(table.to_string()).or_default();
        for (key, payload) in records {
            stored.insert(key.clone(), payload.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        table: &str,
        predicate: &str,
        limit: i64,
    ) -> StoreResult<Vec<(String, Record)>> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if !predicate.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .tables
            .lock()
            .expect("gateway table lock poisoned")
            .get(table)
            .map(|t| {
                t.iter()
                    .take(limit.max(0) as usize)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: i64) -> Record {
        let mut map = Record::new();
        map.insert("n".to_string(), json!(value));
        map
    }

    #[tokio::test]
    async fn test_upsert_then_read() {
        let gateway = InMemoryGateway::new();
        gateway
            .batch_upsert("t", &[("k1".to_string(), payload(1))])
            .await
            .unwrap();

        let loaded = gateway.read("t", "k1").await.unwrap().unwrap();
        assert_eq!(loaded["n"], json!(1));
        assert_eq!(gateway.read_calls(), 1);
        assert_eq!(gateway.upsert_calls(), 1);
    }

    #[tokio::test]
    async fn test_read_absent_key() {
        let gateway = InMemoryGateway::new();
        assert!(gateway.read("t", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let gateway = InMemoryGateway::new();
        gateway
            .batch_upsert("t", &[("k1".to_string(), payload(1))])
            .await
            .unwrap();
        gateway
            .batch_upsert("t", &[("k1".to_string(), payload(2))])
            .await
            .unwrap();

        let loaded = gateway.read("t", "k1").await.unwrap().unwrap();
        assert_eq!(loaded["n"], json!(2));
        assert_eq!(gateway.stored_len("t"), 1);
    }

    #[tokio::test]
    async fn test_query_respects_limit() {
        let gateway = InMemoryGateway::new();
        let batch: Vec<(String, Record)> = (0..5)
            .map(|i| (format!("k{}", i), payload(i)))
            .collect();
        gateway.batch_upsert("t", &batch).await.unwrap();

        let rows = gateway.query("t", "", 3).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(gateway.query_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_table_is_idempotent() {
        let gateway = InMemoryGateway::new();
        gateway.create_table("t", &json!({})).await.unwrap();
        gateway
            .batch_upsert("t", &[("k1".to_string(), payload(1))])
            .await
            .unwrap();
        gateway.create_table("t", &json!({})).await.unwrap();

        assert_eq!(gateway.stored_len("t"), 1);
        assert_eq!(gateway.create_calls(), 2);
    }
}
