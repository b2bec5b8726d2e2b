//! Persistence Gateway Trait
//!
//! The narrow interface between the cache engine and the backing relational
//! store. The engine depends only on this contract; concrete backends live
//! alongside it in this module.

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::Record;
use crate::error::StoreResult;

// == Persistence Gateway ==
/// Backing-store operations consumed by the cache engine.
///
/// Implementations must be thread-safe; the engine shares one gateway across
/// concurrent callers and the maintenance loops.
///
/// # Error Contract
///
/// Failures are propagated verbatim to the engine caller; the gateway
/// performs no retries of its own. `batch_upsert` must be all-or-nothing:
/// a partial failure fails the whole call with no visible partial success.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Ensures a backing table exists for `table`.
    ///
    /// Idempotent: succeeds if the table already exists. The backing table
    /// must carry an index suitable for predicate queries on the payload.
    async fn create_table(&self, table: &str, schema: &Value) -> StoreResult<()>;

    /// Point-reads a single record by key. Returns `None` if absent.
    async fn read(&self, table: &str, key: &str) -> StoreResult<Option<Record>>;

    /// Inserts or updates every record in the batch, stamping a server-side
    /// last-updated timestamp per key.
    async fn batch_upsert(&self, table: &str, records: &[(String, Record)]) -> StoreResult<()>;

    /// Runs a predicate query against the backing table.
    ///
    /// `predicate` is an opaque fragment in the backing store's native query
    /// language; an empty fragment matches all rows. `limit` bounds the
    /// result count. Rows come back as `(key, payload)` pairs.
    async fn query(
        &self,
        table: &str,
        predicate: &str,
        limit: i64,
    ) -> StoreResult<Vec<(String, Record)>>;
}
