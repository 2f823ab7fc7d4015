//! One full run: validate, dispatch every lookup, reconcile.

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::domain::{validate_word, DomainChecker, RegistrationLookup};
use crate::error::{Result, SweepError};
use crate::reconcile::{reconcile, ReconciliationReport};
use crate::store::{FileOutcomeStore, OutputLayout};
use crate::types::{SweepConfig, SweepSummary};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub summary: SweepSummary,
    pub reconciliation: ReconciliationReport,
}

/// Check `word` against `targets` (the whole `universe` when `None`), then
/// reconcile the outcome files against the whole universe.
///
/// The word is validated before any file is touched.
pub async fn sweep(
    word: &str,
    universe: &[String],
    targets: Option<&[String]>,
    lookup: Arc<dyn RegistrationLookup>,
    config: &SweepConfig,
) -> Result<SweepReport> {
    validate_word(word)?;

    let layout = OutputLayout::new(&config.output_dir);
    std::fs::create_dir_all(layout.dir()).map_err(|e| {
        SweepError::io(e.to_string(), Some(layout.dir().to_string_lossy().to_string()))
    })?;

    let store = Arc::new(FileOutcomeStore::new(layout.clone(), word));
    let checker = Arc::new(DomainChecker::new(lookup, store, config.retry));
    let dispatcher = Dispatcher::new(Arc::clone(&checker), config.workers)
        .with_progress(config.show_progress);

    let targets = targets.unwrap_or(universe);
    tracing::info!(
        word = %word,
        tlds = targets.len(),
        workers = dispatcher.workers(),
        attempts = config.retry.attempts,
        "Starting sweep"
    );

    let summary = dispatcher.run(word, targets).await;

    let stats = checker.get_metrics_snapshot();
    tracing::debug!(
        lookups = stats.lookups,
        failures = stats.failures,
        avg_lookup_ms = stats.avg_lookup_time_ms(),
        "Lookup metrics"
    );

    let reconciliation = reconcile(word, universe, &layout)?;

    Ok(SweepReport {
        summary,
        reconciliation,
    })
}
