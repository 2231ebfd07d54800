//! CSV reading and writing
//!
//! Writes go through a temporary sibling file that is persisted into place,
//! so readers never observe a half-written file.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::StoreError;

/// Column holding repository URLs in the input file
pub const URL_COLUMN: &str = "url";

/// Read the repository list: non-blank `url` cells, deduplicated in first-seen order
pub fn read_repository_urls(path: &Path) -> Result<Vec<String>, StoreError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let idx = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == URL_COLUMN)
        .ok_or_else(|| StoreError::MissingColumn {
            path: path.to_path_buf(),
            column: URL_COLUMN.to_string(),
        })?;

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        let Some(url) = record.get(idx).map(str::trim).filter(|u| !u.is_empty()) else {
            continue;
        };
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    }

    debug!("Read {} repository URLs from {}", urls.len(), path.display());
    Ok(urls)
}

/// Deserialize every row of a CSV file
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Write rows to `path`, replacing any existing file
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    let tmp = serialize_to_temp(path, rows)?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// Write rows to `path`, failing with `AlreadyExists` if the file is already there.
///
/// The existence check and the write are a single atomic step.
pub fn write_new_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    let tmp = serialize_to_temp(path, rows)?;
    tmp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            StoreError::AlreadyExists(path.to_path_buf())
        } else {
            StoreError::Io(e.error)
        }
    })?;
    Ok(())
}

fn serialize_to_temp<T: Serialize>(path: &Path, rows: &[T]) -> Result<NamedTempFile, StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().flush()?;
    Ok(tmp)
}
