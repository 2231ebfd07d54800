//! Merge every cached repository into one commit dataset

use common::models::CommitRecord;
use tracing::debug;

use crate::repo_store::RepoStore;
use crate::StoreError;

/// All cached commits, concatenated with no ordering guarantee
#[derive(Debug, Clone)]
pub struct CombinedDataset {
    pub records: Vec<CommitRecord>,
    pub repo_count: usize,
}

/// Concatenate every stored repository.
///
/// Returns `None` when the store holds nothing, which callers must report as
/// "nothing to combine" rather than treat as an empty dataset.
pub fn combine<S: RepoStore>(store: &S) -> Result<Option<CombinedDataset>, StoreError> {
    let names = store.names()?;
    if names.is_empty() {
        return Ok(None);
    }

    let mut records = Vec::new();
    for name in &names {
        let loaded = store.load(name)?;
        debug!("Loaded {} commits for {}", loaded.len(), name);
        records.extend(loaded);
    }

    Ok(Some(CombinedDataset {
        records,
        repo_count: names.len(),
    }))
}
