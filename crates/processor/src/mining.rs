//! Mine every listed repository into the per-repo store

use chrono::NaiveDateTime;
use miner::HistoryMiner;
use store::{RepoStore, StoreError};
use tracing::{debug, info, warn};

/// A repository whose mining or caching failed
#[derive(Debug, Clone, PartialEq)]
pub struct RepoFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome counts for one pass over the repository list
#[derive(Debug, Clone, Default)]
pub struct MiningProgress {
    pub repos_total: usize,
    pub repos_processed: usize,
    /// Newly mined and cached
    pub mined: usize,
    /// Skipped because a cache entry already existed
    pub cached: usize,
    /// Mined but produced no commits since the cutoff
    pub empty: usize,
    pub failed: Vec<RepoFailure>,
}

/// Mine each repository not already in `store` and cache its commits.
///
/// A failure is recorded for that repository and the loop moves on; nothing
/// here aborts the batch.
pub async fn mine_repositories<M, S>(
    miner: &M,
    store: &S,
    urls: &[String],
    since: NaiveDateTime,
) -> MiningProgress
where
    M: HistoryMiner,
    S: RepoStore,
{
    let mut progress = MiningProgress {
        repos_total: urls.len(),
        ..MiningProgress::default()
    };

    info!("Mining {} repositories since {}", urls.len(), since);

    for url in urls {
        mine_one(miner, store, url, since, &mut progress).await;
        progress.repos_processed += 1;

        // Log progress every 10 repositories
        if progress.repos_processed % 10 == 0 {
            info!(
                "Progress: {}/{} repositories, {} mined, {} cached, {} failed",
                progress.repos_processed,
                progress.repos_total,
                progress.mined,
                progress.cached,
                progress.failed.len()
            );
        }
    }

    info!(
        "Mining complete: {} mined, {} cached, {} empty, {} failed",
        progress.mined,
        progress.cached,
        progress.empty,
        progress.failed.len()
    );

    progress
}

async fn mine_one<M, S>(
    miner: &M,
    store: &S,
    url: &str,
    since: NaiveDateTime,
    progress: &mut MiningProgress,
) where
    M: HistoryMiner,
    S: RepoStore,
{
    let name = match common::canonical_name(url) {
        Ok(name) => name,
        Err(e) => return record_failure(progress, url, e.to_string()),
    };

    if store.exists(&name) {
        debug!("{} already cached as {}", url, name);
        progress.cached += 1;
        return;
    }

    let records = match miner.mine(url, since).await {
        Ok(records) => records,
        Err(e) => return record_failure(progress, url, e.to_string()),
    };

    if records.is_empty() {
        warn!("No commits in {} since {}", url, since);
        progress.empty += 1;
        return;
    }

    match store.save(&name, &records) {
        Ok(()) => {
            info!("Cached {} commits from {} as {}", records.len(), url, name);
            progress.mined += 1;
        }
        Err(StoreError::AlreadyExists(path)) => {
            debug!("{} was cached concurrently at {}", url, path.display());
            progress.cached += 1;
        }
        Err(e) => record_failure(progress, url, e.to_string()),
    }
}

fn record_failure(progress: &mut MiningProgress, url: &str, reason: String) {
    warn!("Skipping {}: {}", url, reason);
    progress.failed.push(RepoFailure {
        url: url.to_string(),
        reason,
    });
}
