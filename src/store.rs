//! Append-only outcome storage
//!
//! Every decided lookup appends one `<domain>\n` line to either
//! `available_domains_for_<word>.txt` or `unavailable_domains_for_<word>.txt`.
//! Files are never rewritten, only appended to.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, SweepError};
use crate::types::Outcome;

/// Where a sweep reads and writes its files
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn available_path(&self, word: &str) -> PathBuf {
        self.dir.join(format!("available_domains_for_{}.txt", word))
    }

    pub fn unavailable_path(&self, word: &str) -> PathBuf {
        self.dir.join(format!("unavailable_domains_for_{}.txt", word))
    }

    pub fn unchecked_path(&self) -> PathBuf {
        self.dir.join("unchecked_domains.txt")
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.dir.join("errors.log")
    }

    /// Outcome file for a recorded outcome; `None` for Unchecked, which is never stored
    pub fn outcome_path(&self, word: &str, outcome: Outcome) -> Option<PathBuf> {
        match outcome {
            Outcome::Available => Some(self.available_path(word)),
            Outcome::Unavailable => Some(self.unavailable_path(word)),
            Outcome::Unchecked => None,
        }
    }
}

/// Durable sink for decided outcomes.
///
/// Implementations must make each append atomic with respect to other
/// appenders: a line is either fully present or absent, never interleaved.
pub trait OutcomeStore: Send + Sync {
    fn append(&self, outcome: Outcome, domain: &str) -> Result<()>;
}

/// Outcome files for one word on the local filesystem
pub struct FileOutcomeStore {
    word: String,
    layout: OutputLayout,
    available_lock: Mutex<()>,
    unavailable_lock: Mutex<()>,
}

impl FileOutcomeStore {
    pub fn new(layout: OutputLayout, word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            layout,
            available_lock: Mutex::new(()),
            unavailable_lock: Mutex::new(()),
        }
    }

    fn lock_for(&self, outcome: Outcome) -> Option<&Mutex<()>> {
        match outcome {
            Outcome::Available => Some(&self.available_lock),
            Outcome::Unavailable => Some(&self.unavailable_lock),
            Outcome::Unchecked => None,
        }
    }
}

impl OutcomeStore for FileOutcomeStore {
    fn append(&self, outcome: Outcome, domain: &str) -> Result<()> {
        let (Some(path), Some(lock)) = (
            self.layout.outcome_path(&self.word, outcome),
            self.lock_for(outcome),
        ) else {
            return Err(SweepError::internal(format!(
                "refusing to store '{}' as {}",
                domain, outcome
            )));
        };

        let line = format!("{}\n", domain);
        let path_str = || Some(path.to_string_lossy().to_string());

        // One O_APPEND handle per append, one write_all per line.
        let _guard = lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SweepError::io(e.to_string(), path_str()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| SweepError::io(e.to_string(), path_str()))?;

        Ok(())
    }
}
