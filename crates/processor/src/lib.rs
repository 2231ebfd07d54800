//! Commit aggregation, feature scaling and engagement scoring

pub mod aggregate;
pub mod features;
pub mod mining;
pub mod pipeline;
pub mod reduce;
pub mod scaling;

#[cfg(test)]
mod aggregate_test;
#[cfg(test)]
mod reduce_test;

pub use mining::{mine_repositories, MiningProgress, RepoFailure};
pub use pipeline::{run, score_commits, PipelineError, RunSummary};
pub use reduce::Pca;
