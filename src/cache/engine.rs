//! Cache Engine Module
//!
//! The write-back core: orchestrates per-table caches and their dirty-key
//! sets over a persistence gateway. Writes land in memory marked dirty and
//! reach the backing store through flushes; reads are served read-through.
//!
//! All mutable state lives behind a single engine-wide async mutex covering
//! each logical operation. The lock is deliberately coarse: an entry's dirty
//! flag and its dirty-set membership always change together, and no caller
//! ever observes a half-applied transition. The cost is that a gateway call
//! made under the lock (flush, and the miss path of get) blocks every other
//! cache operation for its duration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::info;

use crate::cache::{current_timestamp_ms, Record, StatsSnapshot, StoreStats, TableCache, KEY_FIELD};
use crate::config::Config;
use crate::error::StoreResult;
use crate::storage::PersistenceGateway;
use crate::tasks::Maintenance;

// == Engine State ==
/// All mutable engine state, guarded by the engine-wide lock.
#[derive(Default)]
struct EngineState {
    /// Per-table caches (entries plus dirty-key sets)
    tables: HashMap<String, TableCache>,
    /// Registered table schemas; registration gates get and query
    schemas: HashMap<String, Value>,
    /// Operation counters
    stats: StoreStats,
}

// == Cache Engine ==
/// Hybrid memory/disk record store.
///
/// Cheap to share: wrap in an [`Arc`] and clone the handle. All operations
/// take `&self`.
pub struct CacheEngine {
    state: Mutex<EngineState>,
    gateway: Arc<dyn PersistenceGateway>,
    flush_interval: Duration,
    evict_interval: Duration,
    maintenance: std::sync::Mutex<Option<Maintenance>>,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine over `gateway` with intervals from `config`.
    ///
    /// `flush_interval` doubles as the dirty-age threshold for the periodic
    /// flush trigger, and `evict_interval` doubles as the idle threshold
    /// for eviction.
    pub fn new(gateway: Arc<dyn PersistenceGateway>, config: &Config) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            gateway,
            flush_interval: Duration::from_secs(config.flush_interval),
            evict_interval: Duration::from_secs(config.evict_interval),
            maintenance: std::sync::Mutex::new(None),
        }
    }

    /// Write-back flush interval (also the dirty-age threshold).
    pub fn flush_interval(&self) -> Duration {
        self.flush_interval
    }

    /// Eviction interval (also the idle threshold).
    pub fn evict_interval(&self) -> Duration {
        self.evict_interval
    }

    // == Start ==
    /// Starts the periodic flush and eviction loops. Idempotent.
    pub fn start(self: &Arc<Self>) {
        let mut maintenance = self
            .maintenance
            .lock()
            .expect("maintenance handle lock poisoned");
        if maintenance.is_none() {
            *maintenance = Some(Maintenance::spawn(Arc::clone(self)));
            info!(
                "Store started: flush={}s, evict={}s",
                self.flush_interval.as_secs(),
                self.evict_interval.as_secs()
            );
        }
    }

    // == Stop ==
    /// Cancels both maintenance loops and performs a final flush.
    ///
    /// Returns the number of records persisted by the final flush.
    pub async fn stop(&self) -> StoreResult<usize> {
        let maintenance = self
            .maintenance
            .lock()
            .expect("maintenance handle lock poisoned")
            .take();
        if let Some(m) = maintenance {
            m.abort();
        }

        let flushed = self.flush(None).await?;
        info!("Store stopped");
        Ok(flushed)
    }

    // == Create Table ==
    /// Registers a table and ensures its backing table exists.
    ///
    /// Idempotent: a table already in the registry is left untouched. The
    /// gateway call runs outside the lock; if it fails the table stays
    /// unregistered and the error propagates to the caller.
    pub async fn create_table(&self, table: &str, schema: Value) -> StoreResult<()> {
        {
            let state = self.state.lock().await;
            if state.schemas.contains_key(table) {
                return Ok(());
            }
        }

        self.gateway.create_table(table, &schema).await?;

        let mut state = self.state.lock().await;
        state.schemas.entry(table.to_string()).or_insert(schema);
        Ok(())
    }

    // == Insert ==
    /// Stores a record in memory, marked dirty for a later flush.
    ///
    /// Auto-registers the table with an empty schema if needed; apart from
    /// a propagated create-table failure, insert itself never fails.
    pub async fn insert(&self, table: &str, key: &str, payload: Record) -> StoreResult<()> {
        self.create_table(table, Value::Object(Record::new()))
            .await?;

        let now = current_timestamp_ms();
        let mut state = self.state.lock().await;
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .insert_dirty(key, payload, now);
        state.stats.record_insert();
        Ok(())
    }

    // == Upsert ==
    /// Inserts or replaces a record. Semantic alias for [`insert`].
    ///
    /// [`insert`]: CacheEngine::insert
    pub async fn upsert(&self, table: &str, key: &str, payload: Record) -> StoreResult<()> {
        self.insert(table, key, payload).await
    }

    // == Get ==
    /// Retrieves a record, read-through.
    ///
    /// With `use_cache` a cached entry is returned directly (touching its
    /// access time); otherwise the call counts a miss and falls through to
    /// the gateway, materializing a clean entry for future hits when
    /// `use_cache` is set. An unregistered table yields `None` with no
    /// gateway call.
    ///
    /// The lock is held across the gateway read so a concurrent flush can
    /// never interleave with the materialization of the loaded entry.
    pub async fn get(&self, table: &str, key: &str, use_cache: bool) -> StoreResult<Option<Record>> {
        let now = current_timestamp_ms();
        let mut state = self.state.lock().await;

        if use_cache {
            let hit = state
                .tables
                .get_mut(table)
                .and_then(|t| t.get_mut(key))
                .map(|entry| {
                    entry.touch(now);
                    entry.payload.clone()
                });
            if let Some(payload) = hit {
                state.stats.record_hit();
                return Ok(Some(payload));
            }
        }

        state.stats.record_miss();
        if !state.schemas.contains_key(table) {
            return Ok(None);
        }

        match self.gateway.read(table, key).await? {
            Some(payload) => {
                if use_cache {
                    state
                        .tables
                        .entry(table.to_string())
                        .or_default()
                        .insert_clean(key, payload.clone(), now);
                }
                Ok(Some(payload))
            }
            None => Ok(None),
        }
    }

    // == Query ==
    /// Runs a predicate query against the backing store, bypassing the
    /// cache. Each row's payload is tagged with its key under
    /// [`KEY_FIELD`]. An unregistered table yields an empty result with no
    /// gateway call.
    pub async fn query(
        &self,
        table: &str,
        predicate: &str,
        limit: i64,
    ) -> StoreResult<Vec<Record>> {
        {
            let state = self.state.lock().await;
            if !state.schemas.contains_key(table) {
                return Ok(Vec::new());
            }
        }

        let rows = self.gateway.query(table, predicate, limit).await?;
        Ok(rows
            .into_iter()
            .map(|(key, mut payload)| {
                payload.insert(KEY_FIELD.to_string(), Value::String(key));
                payload
            })
            .collect())
    }

    // == Flush ==
    /// Persists dirty records: one named table, or every table holding
    /// dirty keys. Returns the number of records flushed.
    ///
    /// Each table's batch goes to the gateway in a single upsert. On
    /// failure the error propagates with the dirty state untouched, so a
    /// later flush naturally retries the same batch. On success the dirty
    /// flags and dirty-set entries are cleared in the same critical section
    /// that snapshotted the batch. Tables with nothing dirty are skipped
    /// without a gateway call.
    pub async fn flush(&self, table: Option<&str>) -> StoreResult<usize> {
        let mut state = self.state.lock().await;

        let tables: Vec<String> = match table {
            Some(name) => vec![name.to_string()],
            None => state
                .tables
                .iter()
                .filter(|(_, t)| t.dirty_len() > 0)
                .map(|(name, _)| name.clone())
                .collect(),
        };

        let mut total = 0;
        for name in tables {
            let batch = match state.tables.get(&name) {
                Some(t) => t.dirty_batch(),
                None => continue,
            };
            if batch.is_empty() {
                continue;
            }

            self.gateway.batch_upsert(&name, &batch).await?;

            if let Some(t) = state.tables.get_mut(&name) {
                for (key, _) in &batch {
                    t.mark_clean(key);
                }
            }
            state.stats.record_flush(batch.len());
            total += batch.len();
            info!("Flushed {} records from {}", batch.len(), name);
        }

        Ok(total)
    }

    // == Evict Idle ==
    /// Removes clean entries idle past the eviction threshold, across all
    /// tables. Dirty entries are never evicted. Returns the number removed.
    pub async fn evict_idle(&self, now: u64) -> usize {
        let threshold = self.evict_interval.as_millis() as u64;
        let mut state = self.state.lock().await;

        let mut evicted = 0;
        for table in state.tables.values_mut() {
            evicted += table.evict_idle(now, threshold);
        }
        state.stats.record_evictions(evicted);

        if evicted > 0 {
            info!("Evicted {} idle records", evicted);
        }
        evicted
    }

    // == Aged Dirty Probe ==
    /// Returns true if any entry has been dirty for at least the flush
    /// interval. Read-only probe used by the periodic flush loop's age
    /// gate.
    pub async fn has_aged_dirty(&self, now: u64) -> bool {
        let age = self.flush_interval.as_millis() as u64;
        let state = self.state.lock().await;
        state.tables.values().any(|t| t.has_aged_dirty(now, age))
    }

    // == Stats ==
    /// Takes a consistent snapshot of the counters and derived totals.
    pub async fn stats(&self) -> StatsSnapshot {
        let state = self.state.lock().await;
        let cached_records = state.tables.values().map(|t| t.len()).sum();
        let dirty_records = state.tables.values().map(|t| t.dirty_len()).sum();
        state
            .stats
            .snapshot(cached_records, dirty_records, state.schemas.len())
    }
}
