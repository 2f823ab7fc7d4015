//! Reconciliation: which TLDs never got an outcome

use std::collections::{BTreeSet, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::tld_of;
use crate::error::{Result, SweepError};
use crate::store::OutputLayout;

/// Result of a reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationReport {
    /// TLDs of the universe with no recorded outcome, sorted
    pub unchecked: BTreeSet<String>,
    /// Distinct TLDs found across both outcome files
    pub recorded: usize,
    /// Where the unchecked list was written
    pub path: PathBuf,
}

/// Diff the TLD universe against both outcome files for `word` and overwrite
/// `unchecked_domains.txt` with the gaps.
///
/// Missing outcome files count as empty. Output is sorted, so running this
/// twice on unchanged inputs writes identical bytes.
pub fn reconcile(word: &str, universe: &[String], layout: &OutputLayout) -> Result<ReconciliationReport> {
    let recorded = recorded_tlds(word, layout)?;

    let unchecked: BTreeSet<String> = universe
        .iter()
        .map(|tld| tld.to_lowercase())
        .filter(|tld| !recorded.contains(tld))
        .collect();

    let path = layout.unchecked_path();
    let content = unchecked.iter().cloned().collect::<Vec<_>>().join("\n");
    std::fs::write(&path, content)
        .map_err(|e| SweepError::io(e.to_string(), Some(path.to_string_lossy().to_string())))?;

    tracing::info!(
        word = %word,
        universe = universe.len(),
        recorded = recorded.len(),
        unchecked = unchecked.len(),
        "Reconciliation completed"
    );

    Ok(ReconciliationReport {
        unchecked,
        recorded: recorded.len(),
        path,
    })
}

/// TLDs that appear as the last label of any line in either outcome file
pub fn recorded_tlds(word: &str, layout: &OutputLayout) -> Result<HashSet<String>> {
    let mut recorded = HashSet::new();

    for path in [layout.available_path(word), layout.unavailable_path(word)] {
        let content = read_or_empty(&path)?;
        recorded.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| tld_of(line).to_lowercase()),
        );
    }

    Ok(recorded)
}

/// TLDs listed in `unchecked_domains.txt`, for a retry pass
pub fn load_unchecked(layout: &OutputLayout) -> Result<Vec<String>> {
    let path = layout.unchecked_path();
    let content = std::fs::read_to_string(&path)
        .map_err(|e| SweepError::io(e.to_string(), Some(path.to_string_lossy().to_string())))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_lowercase)
        .collect())
}

fn read_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(SweepError::io(e.to_string(), Some(path.to_string_lossy().to_string()))),
    }
}
