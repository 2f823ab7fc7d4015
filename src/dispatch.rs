//! Concurrent dispatch of per-TLD lookups

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;

use crate::domain::DomainChecker;
use crate::types::SweepSummary;

/// Fans lookups out over a bounded pool of workers
pub struct Dispatcher {
    checker: Arc<DomainChecker>,
    workers: usize,
    show_progress: bool,
}

impl Dispatcher {
    pub fn new(checker: Arc<DomainChecker>, workers: usize) -> Self {
        Self {
            checker,
            workers: workers.max(1),
            show_progress: true,
        }
    }

    /// Show or hide the stderr progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Check `word` against every TLD and wait for all of them.
    ///
    /// Each lookup runs in its own task, at most `workers` at a time. A task
    /// that panics is logged and counted; it never stops the rest of the batch.
    pub async fn run(&self, word: &str, tlds: &[String]) -> SweepSummary {
        let batch_start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let progress = self.progress_bar(tlds.len() as u64);

        let mut pending: FuturesUnordered<_> = tlds
            .iter()
            .map(|tld| {
                let checker = Arc::clone(&self.checker);
                let semaphore = Arc::clone(&semaphore);
                let word = word.to_string();
                let tld = tld.clone();
                let label = tld.clone();

                let handle = tokio::spawn(async move {
                    // The semaphore is never closed, so a permit always arrives.
                    let _permit = semaphore.acquire_owned().await.ok();
                    checker.check_tld(&word, &tld).await
                });
                async move { (label, handle.await) }
            })
            .collect();

        let mut summary = SweepSummary {
            total: tlds.len(),
            ..Default::default()
        };

        while let Some((tld, joined)) = pending.next().await {
            match joined {
                Ok(report) => {
                    progress.set_message(report.domain.clone());
                    summary.record(&report);
                }
                Err(e) => {
                    tracing::error!(tld = %tld, word = %word, error = %e, "Lookup task crashed");
                    summary.record_crash();
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        summary.elapsed = batch_start.elapsed();

        tracing::info!(
            word = %word,
            total = summary.total,
            available = summary.available,
            unavailable = summary.unavailable,
            unchecked = summary.unchecked,
            crashed = summary.crashed,
            batch_duration_ms = %summary.elapsed.as_millis(),
            "Batch domain check completed"
        );

        summary
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        ProgressBar::new(total).with_style(style)
    }
}
