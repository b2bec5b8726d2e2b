//! Write-Back Flush Task
//!
//! Background task that periodically persists aged dirty records.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::{current_timestamp_ms, CacheEngine};

/// Spawns a background task that periodically flushes dirty records.
///
/// The task runs in an infinite loop, sleeping for the flush interval
/// between runs. Each iteration first probes, read-only, whether any record
/// has been dirty for at least one full interval; only then does it trigger
/// a flush across all tables. Recently-dirtied records wait for their own
/// age threshold, so a record that churns faster than the interval is not
/// rewritten every cycle.
///
/// A record dirtied just after a sleep cycle begins can wait up to two full
/// intervals before the loop persists it.
///
/// A failed iteration (for example, the backing store being unreachable) is
/// logged and the loop continues; only aborting the returned handle stops
/// it.
///
/// # Arguments
/// * `engine` - Shared cache engine
/// * `interval` - Sleep period between flush checks
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during shutdown.
pub fn spawn_flush_task(engine: Arc<CacheEngine>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting write-back flush task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let now = current_timestamp_ms();
            if !engine.has_aged_dirty(now).await {
                debug!("Periodic flush: no records dirty long enough");
                continue;
            }

            match engine.flush(None).await {
                Ok(flushed) => debug!("Periodic flush persisted {} records", flushed),
                Err(e) => error!("Periodic flush failed: {}", e),
            }
        }
    })
}
