//! Per-repository commit cache
//!
//! Once a repository's file is written it is authoritative: the pipeline skips
//! mining whenever `exists` is true, so reruns are cheap and idempotent but a
//! changed cutoff never refreshes an existing file.

use std::fs;
use std::path::{Path, PathBuf};

use common::models::CommitRecord;
use tracing::debug;

use crate::tabular;
use crate::StoreError;

const EXTENSION: &str = "csv";

/// Keyed storage of mined commits, one independent unit per repository name
pub trait RepoStore {
    fn exists(&self, name: &str) -> bool;

    fn load(&self, name: &str) -> Result<Vec<CommitRecord>, StoreError>;

    /// Persist records under `name`; an existing entry is never replaced
    fn save(&self, name: &str, records: &[CommitRecord]) -> Result<(), StoreError>;

    /// Every stored name, sorted
    fn names(&self) -> Result<Vec<String>, StoreError>;
}

/// One CSV file per repository inside a cache directory
#[derive(Debug, Clone)]
pub struct CsvRepoStore {
    dir: PathBuf,
}

impl CsvRepoStore {
    /// Open the cache directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }
}

impl RepoStore for CsvRepoStore {
    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn load(&self, name: &str) -> Result<Vec<CommitRecord>, StoreError> {
        tabular::read_rows(&self.path_for(name))
    }

    fn save(&self, name: &str, records: &[CommitRecord]) -> Result<(), StoreError> {
        let path = self.path_for(name);
        tabular::write_new_rows(&path, records)?;
        debug!("Cached {} commits at {}", records.len(), path.display());
        Ok(())
    }

    fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
