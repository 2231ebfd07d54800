//! File-backed storage for mined commits and pipeline outputs

use std::path::PathBuf;

use thiserror::Error;

pub mod combine;
pub mod repo_store;
pub mod tabular;


pub use combine::{combine, CombinedDataset};
pub use repo_store::{CsvRepoStore, RepoStore};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{path}: missing column `{column}`")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Refusing to overwrite existing file {0}")]
    AlreadyExists(PathBuf),
}
