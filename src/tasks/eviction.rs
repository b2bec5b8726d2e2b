//! Idle Eviction Task
//!
//! Background task that periodically drops clean, idle records from memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{current_timestamp_ms, CacheEngine};

/// Spawns a background task that periodically evicts idle cache entries.
///
/// The task runs in an infinite loop, sleeping for the eviction interval
/// between passes and then evicting unconditionally. Dirty entries are
/// never touched; they stay pinned in memory until flushed. Only aborting
/// the returned handle stops the loop.
///
/// # Arguments
/// * `engine` - Shared cache engine
/// * `interval` - Sleep period between eviction passes
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during shutdown.
pub fn spawn_eviction_task(engine: Arc<CacheEngine>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting idle eviction task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let evicted = engine.evict_idle(current_timestamp_ms()).await;
            if evicted == 0 {
                debug!("Periodic eviction: no idle entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Record;
    use crate::config::Config;
    use crate::storage::InMemoryGateway;
    use serde_json::json;

    fn payload() -> Record {
        let mut map = Record::new();
        map.insert("v".to_string(), json!("x"));
        map
    }

    #[tokio::test]
    async fn test_eviction_task_removes_idle_clean_entries() {
        let gateway = Arc::new(InMemoryGateway::new());
        let config = Config {
            // Sub-second idle threshold via a zero-second interval
            evict_interval: 0,
            ..Config::default()
        };
        let engine = Arc::new(CacheEngine::new(gateway, &config));

        engine.insert("t", "k1", payload()).await.unwrap();
        engine.flush(None).await.unwrap();

        let handle = spawn_eviction_task(engine.clone(), Duration::from_millis(200));

        tokio::time::sleep(Duration::from_millis(700)).await;

        assert_eq!(engine.stats().await.cached_records, 0);
        assert!(engine.stats().await.evictions >= 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_eviction_task_preserves_dirty_entries() {
        let gateway = Arc::new(InMemoryGateway::new());
        let config = Config {
            evict_interval: 0,
            ..Config::default()
        };
        let engine = Arc::new(CacheEngine::new(gateway.clone(), &config));

        engine.insert("t", "k1", payload()).await.unwrap();

        let handle = spawn_eviction_task(engine.clone(), Duration::from_millis(200));

        tokio::time::sleep(Duration::from_millis(700)).await;

        // Unflushed, so still cached despite being idle
        assert_eq!(engine.stats().await.cached_records, 1);
        let loaded = engine.get("t", "k1", true).await.unwrap();
        assert!(loaded.is_some());
        assert_eq!(gateway.read_calls(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_eviction_task_can_be_aborted() {
        let gateway = Arc::new(InMemoryGateway::new());
        let engine = Arc::new(CacheEngine::new(gateway, &Config::default()));

        let handle = spawn_eviction_task(engine, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
