//! Stats Reporter Task
//!
//! Background task that periodically logs bounded cache statistics.

use std::hash::{BuildHasher, Hash};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::mru::BoundedCache;
use crate::sync::Shared;

/// Spawns a background task that logs the cache statistics every interval.
///
/// The task runs until aborted. It only holds the lock long enough to copy
/// the counters, and logs at debug level when nothing changed since the
/// previous report.
///
/// # Example
/// ```ignore
/// let cache = Shared::new(BoundedCache::<String, String>::new(100)?);
/// let reporter = spawn_stats_reporter(cache.clone(), 30);
/// // Later, during shutdown:
/// reporter.abort();
/// ```
pub fn spawn_stats_reporter<K, V, S>(
    cache: Shared<BoundedCache<K, V, S>>,
    report_interval_secs: u64,
) -> JoinHandle<()>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Send + 'static,
    S: BuildHasher + Send + 'static,
{
    let interval = Duration::from_secs(report_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting stats reporter with interval of {} seconds",
            report_interval_secs
        );

        let mut previous = None;
        loop {
            tokio::time::sleep(interval).await;

            let stats = cache.with(|cache| cache.stats()).await;

            if previous == Some(stats) {
                debug!("Cache stats unchanged");
            } else {
                info!(
                    entries = stats.total_entries,
                    hits = stats.hits,
                    misses = stats.misses,
                    evictions = stats.evictions,
                    hit_rate = stats.hit_rate(),
                    "Cache stats"
                );
            }
            previous = Some(stats);
        }
    })
}
