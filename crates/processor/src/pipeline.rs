//! End-to-end engagement pipeline
//!
//! mine -> cache -> combine -> aggregate -> scale -> reduce, strictly in order.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use common::models::{CommitRecord, ScoredAggregate};
use common::Config;
use miner::HistoryMiner;
use store::{combine, tabular, CsvRepoStore, StoreError};
use thiserror::Error;
use tracing::{info, warn};

use crate::aggregate::aggregate_monthly;
use crate::mining::{mine_repositories, MiningProgress};
use crate::reduce::{self, Pca};
use crate::scaling::scale_features;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] common::Error),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
    #[error("No per-repo data found in {}, nothing to combine", .dir.display())]
    NoData { dir: PathBuf },
    #[error("Combined dataset has no commits")]
    EmptyDataset,
}

/// What one full run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mining: MiningProgress,
    pub total_commits: usize,
    pub total_repos: usize,
    pub aggregate_rows: usize,
    pub pca: Pca,
}

/// Run every stage with the paths and window from `config`.
///
/// `now` anchors the mining cutoff. Per-repository failures are contained in
/// `RunSummary::mining`; an empty cache directory stops the run with
/// `PipelineError::NoData` after mining.
pub async fn run<M: HistoryMiner>(
    config: &Config,
    miner: &M,
    now: NaiveDateTime,
) -> Result<RunSummary, PipelineError> {
    let since = config.cutoff(now)?;
    let urls = tabular::read_repository_urls(&config.input_path)?;
    let store = CsvRepoStore::open(&config.repo_cache_dir)?;

    let mining = mine_repositories(miner, &store, &urls, since).await;

    let Some(dataset) = combine(&store)? else {
        warn!("No per-repo data found, nothing to combine");
        return Err(PipelineError::NoData {
            dir: config.repo_cache_dir.clone(),
        });
    };
    tabular::write_rows(&config.combined_path, &dataset.records)?;
    info!(
        "Saved {} total commits from {} repos",
        dataset.records.len(),
        dataset.repo_count
    );

    let (scored, pca) = score_commits(&dataset.records)?;
    tabular::write_rows(&config.output_path, &scored)?;
    info!(
        "Wrote {} scored rows to {}",
        scored.len(),
        config.output_path.display()
    );

    Ok(RunSummary {
        mining,
        total_commits: dataset.records.len(),
        total_repos: dataset.repo_count,
        aggregate_rows: scored.len(),
        pca,
    })
}

/// Aggregate, scale and score a combined commit dataset
pub fn score_commits(
    records: &[CommitRecord],
) -> Result<(Vec<ScoredAggregate>, Pca), PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let aggregates = aggregate_monthly(records);
    info!(
        "Aggregated {} commits into {} monthly rows",
        records.len(),
        aggregates.len()
    );

    let scaled = scale_features(&aggregates);
    let (scored, pca) = reduce::score(scaled).ok_or(PipelineError::EmptyDataset)?;
    pca.report();

    Ok((scored, pca))
}
