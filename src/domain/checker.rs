//! Domain availability checker

use std::sync::Arc;
use std::time::Instant;

use crate::domain::{candidate_domain, is_available, RegistrationLookup};
use crate::error::SweepError;
use crate::store::OutcomeStore;
use crate::types::{Outcome, PerformanceMetrics, RetryPolicy, TaskReport};

/// Looks up one candidate domain with retries and records the outcome
pub struct DomainChecker {
    lookup: Arc<dyn RegistrationLookup>,
    store: Arc<dyn OutcomeStore>,
    retry: RetryPolicy,
    metrics: Arc<PerformanceMetrics>,
}

impl DomainChecker {
    /// Create a new domain checker
    pub fn new(
        lookup: Arc<dyn RegistrationLookup>,
        store: Arc<dyn OutcomeStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            lookup,
            store,
            retry,
            metrics: Arc::new(PerformanceMetrics::new()),
        }
    }

    /// Check `word.tld`, retrying failed lookups per the retry policy.
    ///
    /// On success exactly one line is appended to exactly one outcome file
    /// before this returns. When every attempt fails, one error event is
    /// logged and the TLD is reported Unchecked.
    pub async fn check_tld(&self, word: &str, tld: &str) -> TaskReport {
        let domain = candidate_domain(word, tld);
        let attempts = self.retry.attempts.max(1);
        let mut last_error: Option<SweepError> = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(self.retry.delay).await;
            }

            let start_time = Instant::now();
            match self.lookup.lookup(&domain).await {
                Ok(record) => {
                    self.metrics.record_lookup(start_time.elapsed());
                    let outcome = if is_available(&record) {
                        Outcome::Available
                    } else {
                        Outcome::Unavailable
                    };
                    return self.record(tld, domain, outcome, attempt).await;
                }
                Err(e) => {
                    self.metrics.record_failure();
                    tracing::debug!(
                        domain = %domain,
                        method = self.lookup.method_name(),
                        attempt,
                        error = %e,
                        "Lookup attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no lookup attempted".to_string());

        tracing::error!(
            domain = %domain,
            attempts,
            "Error occurred while checking availability of {}: {}",
            domain,
            message
        );

        TaskReport {
            tld: tld.to_string(),
            domain,
            outcome: Outcome::Unchecked,
            attempts,
            error: Some(message),
        }
    }

    async fn record(&self, tld: &str, domain: String, outcome: Outcome, attempt: u32) -> TaskReport {
        // File appends block, so they run on the blocking pool, off the runtime workers.
        let store = Arc::clone(&self.store);
        let line = domain.clone();
        let appended = tokio::task::spawn_blocking(move || store.append(outcome, &line))
            .await
            .unwrap_or_else(|e| Err(SweepError::internal(format!("outcome writer crashed: {}", e))));

        match appended {
            Ok(()) => {
                tracing::debug!(domain = %domain, outcome = %outcome, attempt, "Domain check completed");
                TaskReport {
                    tld: tld.to_string(),
                    domain,
                    outcome,
                    attempts: attempt,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(
                    domain = %domain,
                    outcome = %outcome,
                    error = %e,
                    "Failed to record outcome for {}",
                    domain
                );
                TaskReport {
                    tld: tld.to_string(),
                    domain,
                    outcome: Outcome::Unchecked,
                    attempts: attempt,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Get the retry policy in use
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Get current metrics snapshot
    pub fn get_metrics_snapshot(&self) -> crate::types::MetricsSnapshot {
        self.metrics.get_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::types::WhoisRecord;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Fails the first `failures` calls, then returns `record`
    struct FlakyLookup {
        failures: u32,
        record: WhoisRecord,
        calls: AtomicU32,
    }

    #[async_trait]
    impl RegistrationLookup for FlakyLookup {
        async fn lookup(&self, domain: &str) -> Result<WhoisRecord> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(SweepError::lookup(domain, format!("connection reset (call {})", call)))
            } else {
                Ok(self.record.clone())
            }
        }

        fn method_name(&self) -> &'static str {
            "flaky"
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        lines: Mutex<Vec<(Outcome, String)>>,
    }

    impl OutcomeStore for MemoryStore {
        fn append(&self, outcome: Outcome, domain: &str) -> Result<()> {
            self.lines.lock().push((outcome, domain.to_string()));
            Ok(())
        }
    }

    struct BrokenStore;

    impl OutcomeStore for BrokenStore {
        fn append(&self, _outcome: Outcome, _domain: &str) -> Result<()> {
            Err(SweepError::io("disk full", None))
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            delay: Duration::from_millis(20),
        }
    }

    fn taken_record() -> WhoisRecord {
        let mut record = WhoisRecord::new();
        record.insert("registrar".to_string(), json!("Example Registrar"));
        record.insert("domain_name".to_string(), serde_json::Value::Null);
        record
    }

    #[tokio::test]
    async fn test_taken_domain_recorded_once() {
        let lookup = Arc::new(FlakyLookup {
            failures: 0,
            record: taken_record(),
            calls: AtomicU32::new(0),
        });
        let store = Arc::new(MemoryStore::default());
        let checker = DomainChecker::new(lookup.clone(), store.clone(), fast_retry());

        let report = checker.check_tld("test", "com").await;

        assert_eq!(report.outcome, Outcome::Unavailable);
        assert_eq!(report.domain, "test.com");
        assert_eq!(report.attempts, 1);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *store.lines.lock(),
            vec![(Outcome::Unavailable, "test.com".to_string())]
        );
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let lookup = Arc::new(FlakyLookup {
            failures: 2,
            record: WhoisRecord::new(),
            calls: AtomicU32::new(0),
        });
        let store = Arc::new(MemoryStore::default());
        let checker = DomainChecker::new(lookup.clone(), store.clone(), fast_retry());

        let report = checker.check_tld("test", "xyz").await;

        assert_eq!(report.outcome, Outcome::Available);
        assert_eq!(report.attempts, 3);
        assert!(report.error.is_none());
        assert_eq!(store.lines.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let lookup = Arc::new(FlakyLookup {
            failures: u32::MAX,
            record: WhoisRecord::new(),
            calls: AtomicU32::new(0),
        });
        let store = Arc::new(MemoryStore::default());
        let checker = DomainChecker::new(lookup.clone(), store.clone(), fast_retry());

        let start = Instant::now();
        let report = checker.check_tld("test", "xyz").await;
        let elapsed = start.elapsed();

        assert_eq!(report.outcome, Outcome::Unchecked);
        assert_eq!(report.attempts, 3);
        assert!(report.error.as_deref().unwrap_or("").contains("call 3"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
        // Two pauses between three attempts
        assert!(elapsed >= Duration::from_millis(40));
        assert!(store.lines.lock().is_empty());

        let stats = checker.get_metrics_snapshot();
        assert_eq!(stats.failures, 3);
        assert_eq!(stats.lookups, 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_not_retried() {
        let lookup = Arc::new(FlakyLookup {
            failures: 0,
            record: taken_record(),
            calls: AtomicU32::new(0),
        });
        let checker = DomainChecker::new(lookup.clone(), Arc::new(BrokenStore), fast_retry());

        let report = checker.check_tld("test", "com").await;

        assert_eq!(report.outcome, Outcome::Unchecked);
        assert!(report.error.as_deref().unwrap_or("").contains("disk full"));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    /// Holds the calling thread for `hold` on every append
    struct SlowStore {
        hold: Duration,
    }

    impl OutcomeStore for SlowStore {
        fn append(&self, _outcome: Outcome, _domain: &str) -> Result<()> {
            std::thread::sleep(self.hold);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_slow_store_does_not_stall_runtime() {
        let lookup = Arc::new(FlakyLookup {
            failures: 0,
            record: taken_record(),
            calls: AtomicU32::new(0),
        });
        let store = Arc::new(SlowStore {
            hold: Duration::from_millis(400),
        });
        let checker = Arc::new(DomainChecker::new(lookup, store, fast_retry()));

        let check = tokio::spawn({
            let checker = Arc::clone(&checker);
            async move { checker.check_tld("test", "com").await }
        });

        // Single-threaded runtime: this timer only fires on time if the append
        // is not holding the runtime thread.
        let start = Instant::now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(start.elapsed() < Duration::from_millis(200));

        let report = check.await.unwrap();
        assert_eq!(report.outcome, Outcome::Unavailable);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let lookup = Arc::new(FlakyLookup {
            failures: 0,
            record: WhoisRecord::new(),
            calls: AtomicU32::new(0),
        });
        let policy = RetryPolicy {
            attempts: 0,
            delay: Duration::ZERO,
        };
        let checker = DomainChecker::new(lookup.clone(), Arc::new(MemoryStore::default()), policy);

        let report = checker.check_tld("test", "com").await;
        assert_eq!(report.outcome, Outcome::Available);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(checker.retry_policy().attempts, 0);
    }
}
