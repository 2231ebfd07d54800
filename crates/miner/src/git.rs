//! History miner backed by the `git` command line

use std::path::{Path, PathBuf};
use std::process::Output;

use chrono::NaiveDateTime;
use common::models::CommitRecord;
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::log_parser::{self, LOG_FORMAT};
use crate::HistoryMiner;

#[derive(Error, Debug)]
pub enum MiningError {
    #[error("Repository unreachable: {location}: {reason}")]
    Unreachable { location: String, reason: String },
    #[error("git failed for {location} ({status}): {stderr}")]
    Git {
        location: String,
        status: String,
        stderr: String,
    },
    #[error("Unparseable history for {location}: {reason}")]
    Parse { location: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MiningError {
    pub fn unreachable(location: &str, reason: impl Into<String>) -> Self {
        Self::Unreachable {
            location: location.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(location: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            location: location.to_string(),
            reason: reason.into(),
        }
    }
}

/// Mines commits by shelling out to `git log`.
///
/// Local directories are read in place. Anything else is treated as a remote
/// and bare-cloned into a scratch directory that lives until mining returns.
/// The dmm quality columns are left empty: git alone has no per-unit
/// complexity data to derive them from.
pub struct GitCliMiner {
    git: PathBuf,
}

impl Default for GitCliMiner {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCliMiner {
    pub fn new() -> Self {
        Self {
            git: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable instead of the one on `PATH`
    pub fn with_binary(git: impl Into<PathBuf>) -> Self {
        Self { git: git.into() }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.git);
        // Never block on credential prompts for private or missing remotes
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        cmd.kill_on_drop(true);
        cmd
    }

    async fn clone_bare(&self, location: &str) -> Result<TempDir, MiningError> {
        let scratch = tempfile::Builder::new()
            .prefix("repo-engagement-")
            .tempdir()?;
        debug!("Cloning {} into {}", location, scratch.path().display());

        let output = self
            .command()
            .args(["clone", "--bare", "--quiet", "--"])
            .arg(location)
            .arg(scratch.path())
            .output()
            .await?;

        if !output.status.success() {
            return Err(MiningError::unreachable(location, stderr_of(&output)));
        }
        Ok(scratch)
    }

    async fn read_log(
        &self,
        location: &str,
        repo_dir: &Path,
        since: NaiveDateTime,
    ) -> Result<String, MiningError> {
        let output = self
            .command()
            .arg("-C")
            .arg(repo_dir)
            .args([
                "log",
                "--reverse",
                "--date-order",
                "--numstat",
                "--diff-merges=first-parent",
                LOG_FORMAT,
            ])
            .arg(format!("--since={}", since.format("%Y-%m-%d %H:%M:%S +0000")))
            .output()
            .await?;

        if !output.status.success() {
            return Err(MiningError::Git {
                location: location.to_string(),
                status: output.status.to_string(),
                stderr: stderr_of(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl HistoryMiner for GitCliMiner {
    async fn mine(
        &self,
        location: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<CommitRecord>, MiningError> {
        let local = Path::new(location);
        let scratch = if local.is_dir() {
            None
        } else {
            Some(self.clone_bare(location).await?)
        };
        let repo_dir = scratch.as_ref().map(|d| d.path()).unwrap_or(local);

        let log = self.read_log(location, repo_dir, since).await?;
        let mut commits = log_parser::parse_log(location, &log)?;
        commits.retain(|c| c.commit_date >= since);

        info!("Mined {} commits from {}", commits.len(), location);
        Ok(commits)
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
