//! Parser for `git log --numstat` output
//!
//! Each commit starts with a record separator (0x1e) followed by a header of
//! unit-separated (0x1f) fields, then one numstat line per touched file:
//!
//! ```text
//! \x1e<hash>\x1f<author email>\x1f<author name>\x1f<committer date, strict ISO 8601>
//!
//! 12\t3\tsrc/lib.rs
//! -\t-\tassets/logo.png
//! ```

use chrono::{DateTime, NaiveDateTime};
use common::models::{developer_identity, CommitRecord};

use crate::git::MiningError;

/// `--format` argument producing the header layout above
pub const LOG_FORMAT: &str = "--format=%x1e%H%x1f%ae%x1f%an%x1f%cI";

const RECORD_SEP: char = '\x1e';
const UNIT_SEP: char = '\x1f';

/// Parse raw log output into commit records attributed to `location`
pub fn parse_log(location: &str, text: &str) -> Result<Vec<CommitRecord>, MiningError> {
    text.split(RECORD_SEP)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| parse_commit(location, chunk))
        .collect()
}

fn parse_commit(location: &str, chunk: &str) -> Result<CommitRecord, MiningError> {
    let mut lines = chunk.lines();
    let header = lines.next().unwrap_or_default();

    let fields: Vec<&str> = header.split(UNIT_SEP).collect();
    let [hash, email, name, date] = fields.as_slice() else {
        return Err(MiningError::parse(
            location,
            format!("malformed commit header: {:?}", header),
        ));
    };

    let hash = hash.trim();
    if hash.is_empty() {
        return Err(MiningError::parse(location, "commit header without hash"));
    }

    let churn = lines
        .filter(|l| !l.trim().is_empty())
        .map(numstat_churn)
        .sum();

    Ok(CommitRecord {
        project_url: location.to_string(),
        developer: developer_identity(Some(email), Some(name)),
        commit_hash: hash.to_string(),
        commit_date: parse_commit_date(location, date.trim())?,
        churn,
        dmm_unit_size: None,
        dmm_unit_complexity: None,
        dmm_unit_interfacing: None,
    })
}

/// Convert an offset timestamp to its UTC wall-clock time without offset
pub fn parse_commit_date(location: &str, raw: &str) -> Result<NaiveDateTime, MiningError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .map_err(|e| MiningError::parse(location, format!("invalid commit date {:?}: {}", raw, e)))
}

/// Added plus deleted lines of one numstat line; binary files (`-`) count 0
fn numstat_churn(line: &str) -> u64 {
    let mut parts = line.split('\t');
    let added = parts.next().and_then(|s| s.trim().parse::<u64>().ok());
    let deleted = parts.next().and_then(|s| s.trim().parse::<u64>().ok());
    added.unwrap_or(0) + deleted.unwrap_or(0)
}
