// src/probe/scan.rs

use std::collections::BTreeMap;

use tracing::{info, warn};

use super::pool_remote_url;
use super::remote::RemoteStore;

/// Scan remote storage and return the pools that already have sufficient
/// files, mapped to their remote URL.
///
/// If the credential check fails the result is empty unconditionally:
/// assume nothing is pre-staged and regenerate everything, rather than
/// returning partial or stale optimistic results. Otherwise each pool is
/// probed independently and sequentially; a pool is included only if its
/// remote file count is at least `min_count`. The threshold test is strict
/// per call, never sticky across scans.
pub async fn scan_pools<S: RemoteStore>(
    store: &S,
    pools: &[String],
    min_count: u64,
) -> BTreeMap<String, String> {
    info!(min_count, "scanning remote storage for existing LHE pools");

    if !store.check_credential().await {
        warn!("credential check failed, assuming no pre-staged pools");
        return BTreeMap::new();
    }

    let mut existing = BTreeMap::new();
    for pool in pools {
        let count = store.count_remote_files(pool).await;
        let sufficient = count >= min_count;
        info!(pool = %pool, count, sufficient, "probed pool");

        if sufficient {
            existing.insert(pool.clone(), pool_remote_url(pool));
        }
    }

    info!(found = existing.len(), "pre-staged pool scan complete");
    existing
}
