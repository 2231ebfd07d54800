//! Pipeline configuration

use std::env;
use std::path::PathBuf;

use chrono::{Months, NaiveDateTime};

use crate::error::{Error, Result};

/// Paths and the mining window for one pipeline run
#[derive(Debug, Clone)]
pub struct Config {
    /// How many calendar months of history to mine
    pub cutoff_months: u32,
    /// Tabular file with a `url` column, one repository per row
    pub input_path: PathBuf,
    /// Directory holding one cache file per repository
    pub repo_cache_dir: PathBuf,
    /// Concatenation of every per-repo cache file
    pub combined_path: PathBuf,
    /// One scored row per (project, month)
    pub output_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cutoff_months: 30,
            input_path: PathBuf::from("active_projects.csv"),
            repo_cache_dir: PathBuf::from("data_active"),
            combined_path: PathBuf::from("commit_data.csv"),
            output_path: PathBuf::from("engagement_data.csv"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cutoff_months: env::var("ENGAGEMENT_CUTOFF_MONTHS")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or(defaults.cutoff_months),
            input_path: env::var("ENGAGEMENT_INPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),
            repo_cache_dir: env::var("ENGAGEMENT_REPO_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.repo_cache_dir),
            combined_path: env::var("ENGAGEMENT_COMBINED_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.combined_path),
            output_path: env::var("ENGAGEMENT_OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
        }
    }

    /// Earliest commit date to mine, `cutoff_months` calendar months before `now`
    pub fn cutoff(&self, now: NaiveDateTime) -> Result<NaiveDateTime> {
        now.checked_sub_months(Months::new(self.cutoff_months))
            .ok_or_else(|| {
                Error::Config(format!(
                    "cutoff of {} months before {} is out of range",
                    self.cutoff_months, now
                ))
            })
    }
}
