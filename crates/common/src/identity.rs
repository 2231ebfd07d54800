//! Canonical repository names
//!
//! The canonical name keys both the per-repo cache file and log lines. It is
//! built from the last two path segments of the source URL, so two different
//! hosts serving the same `org/repo` share one name and one cache file.

use crate::error::{Error, Result};

/// Suffix some hosts append to clone URLs
const VCS_SUFFIX: &str = ".git";

fn is_separator(c: char) -> bool {
    matches!(c, '/' | '\\' | ':')
}

/// Derive the canonical name of a repository from its source URL.
///
/// `https://github.com/org/repo.git`, `https://github.com/org/repo/` and
/// `git@github.com:org/repo.git` all map to `org-repo`.
pub fn canonical_name(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches(is_separator);

    let segments: Vec<&str> = trimmed.split(is_separator).filter(|s| !s.is_empty()).collect();
    let tail = &segments[segments.len().saturating_sub(2)..];

    let name = tail.join("-");
    let name = name.strip_suffix(VCS_SUFFIX).unwrap_or(&name);

    if name.is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }
    Ok(name.to_string())
}
