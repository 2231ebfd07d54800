//! Commit history mining
//!
//! `HistoryMiner` is the seam between the pipeline and whatever walks a
//! repository's commit log. `GitCliMiner` drives the `git` binary.

use chrono::NaiveDateTime;
use common::models::CommitRecord;

pub mod git;
pub mod log_parser;


pub use git::{GitCliMiner, MiningError};

/// Produces the commit records of one repository.
///
/// Records come back in the miner's traversal order, which callers must not
/// treat as chronological. Zero commits is a valid, non-error result.
#[allow(async_fn_in_trait)]
pub trait HistoryMiner {
    /// Mine every commit of `location` committed at or after `since`
    async fn mine(
        &self,
        location: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<CommitRecord>, MiningError>;
}
