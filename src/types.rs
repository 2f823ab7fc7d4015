//! Core types and structures for tld-sweep

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Structured registration record returned by a lookup.
///
/// Field name to value; a field the registry did not report is `null`.
pub type WhoisRecord = BTreeMap<String, serde_json::Value>;

/// Result of checking one candidate domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Available,
    Unavailable,
    Unchecked,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Available => write!(f, "available"),
            Outcome::Unavailable => write!(f, "unavailable"),
            Outcome::Unchecked => write!(f, "unchecked"),
        }
    }
}

/// What a single lookup task reports back to the dispatcher
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub tld: String,
    pub domain: String,
    pub outcome: Outcome,
    pub attempts: u32,
    pub error: Option<String>,
}

/// Fixed-count retry policy for lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Pause between consecutive attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Configuration for a sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub workers: usize,
    pub retry: RetryPolicy,
    pub timeout: Duration,
    pub tld_file: PathBuf,
    pub output_dir: PathBuf,
    pub show_progress: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(10),
            tld_file: PathBuf::from("tlds.txt"),
            output_dir: PathBuf::from("."),
            show_progress: true,
        }
    }
}

/// Worker pool size when none is configured: one per available core.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Totals for a finished sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub total: usize,
    pub available: usize,
    pub unavailable: usize,
    pub unchecked: usize,
    /// Tasks that died before reporting (counted as unchecked as well)
    pub crashed: usize,
    pub elapsed: Duration,
}

impl SweepSummary {
    /// Fold one task report into the totals
    pub fn record(&mut self, report: &TaskReport) {
        match report.outcome {
            Outcome::Available => self.available += 1,
            Outcome::Unavailable => self.unavailable += 1,
            Outcome::Unchecked => self.unchecked += 1,
        }
    }

    /// Count a task that never produced a report
    pub fn record_crash(&mut self) {
        self.crashed += 1;
        self.unchecked += 1;
    }

    pub fn completed(&self) -> usize {
        self.available + self.unavailable + self.unchecked
    }
}

/// Lock-free lookup counters shared across tasks
#[derive(Debug, Default)]
pub struct PerformanceMetrics {
    lookups: AtomicU64,
    failures: AtomicU64,
    total_lookup_ms: AtomicU64,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self, duration: Duration) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        self.total_lookup_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            total_lookup_ms: self.total_lookup_ms.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`PerformanceMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Lookup calls that returned a record
    pub lookups: u64,
    /// Lookup calls that returned an error
    pub failures: u64,
    pub total_lookup_ms: u64,
}

impl MetricsSnapshot {
    pub fn avg_lookup_time_ms(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.total_lookup_ms as f64 / self.lookups as f64
        }
    }
}
