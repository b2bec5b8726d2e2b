//! Background Tasks Module
//!
//! Contains the maintenance loops that run for the lifetime of the store.
//!
//! # Tasks
//! - Write-back flush: persists records that have been dirty for at least
//!   one flush interval
//! - Idle eviction: drops clean entries not accessed within the eviction
//!   interval

mod eviction;
mod flush;

pub use eviction::spawn_eviction_task;
pub use flush::spawn_flush_task;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::CacheEngine;

// == Maintenance ==
/// The pair of maintenance loops, started together and cancelled together.
///
/// Aborting takes effect at the loops' next await point; an in-flight pass
/// is abandoned, not completed. Callers needing a guaranteed final flush
/// invoke it explicitly after stopping.
pub struct Maintenance {
    flush: JoinHandle<()>,
    eviction: JoinHandle<()>,
}

impl Maintenance {
    /// Spawns both loops with the engine's configured intervals.
    pub fn spawn(engine: Arc<CacheEngine>) -> Self {
        let flush = spawn_flush_task(Arc::clone(&engine), engine.flush_interval());
        let eviction = spawn_eviction_task(Arc::clone(&engine), engine.evict_interval());
        Self { flush, eviction }
    }

    /// Cancels both loops.
    pub fn abort(self) {
        self.flush.abort();
        self.eviction.abort();
        debug!("Maintenance tasks aborted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::InMemoryGateway;
    use std::time::Duration;

    #[tokio::test]
    async fn test_maintenance_spawns_and_aborts_as_a_pair() {
        let gateway = Arc::new(InMemoryGateway::new());
        let engine = Arc::new(CacheEngine::new(gateway, &Config::default()));

        let maintenance = Maintenance::spawn(engine);
        let flush = maintenance.flush.abort_handle();
        let eviction = maintenance.eviction.abort_handle();

        assert!(!flush.is_finished());
        assert!(!eviction.is_finished());

        maintenance.abort();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(flush.is_finished());
        assert!(eviction.is_finished());
    }
}
