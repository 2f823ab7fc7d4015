//! Integration tests for tld-sweep

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tld_sweep::{
    sweep,
    tlds::parse_tld_list,
    OutputLayout, RegistrationLookup, Result, RetryPolicy, SweepConfig, SweepError, WhoisRecord,
};

/// Canned answers per domain; anything not listed fails
struct CannedLookup {
    answers: HashMap<String, WhoisRecord>,
    calls: parking_lot::Mutex<HashMap<String, u32>>,
    total_calls: AtomicU32,
}

impl CannedLookup {
    fn new(answers: Vec<(&str, WhoisRecord)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(domain, record)| (domain.to_string(), record))
                .collect(),
            calls: parking_lot::Mutex::new(HashMap::new()),
            total_calls: AtomicU32::new(0),
        }
    }

    fn calls_for(&self, domain: &str) -> u32 {
        self.calls.lock().get(domain).copied().unwrap_or(0)
    }
}

#[async_trait]
impl RegistrationLookup for CannedLookup {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord> {
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().entry(domain.to_string()).or_insert(0) += 1;
        self.answers
            .get(domain)
            .cloned()
            .ok_or_else(|| SweepError::network("connection reset by peer", None))
    }

    fn method_name(&self) -> &'static str {
        "canned"
    }
}

fn taken() -> WhoisRecord {
    let mut record = WhoisRecord::new();
    record.insert("domain_name".to_string(), json!("TEST.COM"));
    record.insert("registrar".to_string(), json!("Example Registrar"));
    record.insert("country".to_string(), serde_json::Value::Null);
    record
}

fn free() -> WhoisRecord {
    let mut record = WhoisRecord::new();
    record.insert("domain_name".to_string(), serde_json::Value::Null);
    record.insert("registrar".to_string(), serde_json::Value::Null);
    record
}

fn config(dir: &std::path::Path) -> SweepConfig {
    SweepConfig {
        workers: 4,
        retry: RetryPolicy {
            attempts: 3,
            delay: Duration::from_millis(10),
        },
        output_dir: dir.to_path_buf(),
        show_progress: false,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_taken_and_failing_tlds() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let universe = parse_tld_list("HEADER\ncom\nxyz\n");
    assert_eq!(universe, vec!["com", "xyz"]);

    let lookup = Arc::new(CannedLookup::new(vec![("test.com", taken())]));
    let report = sweep("test", &universe, None, lookup.clone(), &config(dir.path()))
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(layout.unavailable_path("test")).unwrap(),
        "test.com\n"
    );
    assert!(!layout.available_path("test").exists());
    assert_eq!(std::fs::read_to_string(layout.unchecked_path()).unwrap(), "xyz");

    assert_eq!(lookup.calls_for("test.com"), 1);
    assert_eq!(lookup.calls_for("test.xyz"), 3);
    assert_eq!(report.summary.unavailable, 1);
    assert_eq!(report.summary.unchecked, 1);
    assert_eq!(report.reconciliation.unchecked.len(), 1);
}

#[tokio::test]
async fn test_every_tld_lands_in_exactly_one_set() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let universe = parse_tld_list("# header\ncom\nnet\norg\nio\nxyz\nde\n");

    let lookup = Arc::new(CannedLookup::new(vec![
        ("word.com", taken()),
        ("word.net", taken()),
        ("word.io", free()),
        ("word.de", WhoisRecord::new()),
    ]));
    sweep("word", &universe, None, lookup, &config(dir.path()))
        .await
        .unwrap();

    let read_set = |path: std::path::PathBuf| -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.rsplit('.').next().unwrap_or(l).to_string())
            .collect()
    };
    let available = read_set(layout.available_path("word"));
    let unavailable = read_set(layout.unavailable_path("word"));
    let unchecked = read_set(layout.unchecked_path());

    for tld in &universe {
        let hits = [&available, &unavailable, &unchecked]
            .iter()
            .filter(|set| set.contains(tld))
            .count();
        assert_eq!(hits, 1, "{} should be in exactly one set", tld);
    }

    let mut free_tlds = available.clone();
    free_tlds.sort();
    assert_eq!(free_tlds, vec!["de", "io"]);
    assert_eq!(std::fs::read_to_string(layout.unchecked_path()).unwrap(), "org\nxyz");
}

#[tokio::test]
async fn test_retry_pass_targets_only_unchecked() {
    let dir = tempfile::tempdir().unwrap();
    let layout = OutputLayout::new(dir.path());
    let universe = parse_tld_list("header\ncom\nxyz\n");

    // First pass: .xyz fails every attempt.
    let first = Arc::new(CannedLookup::new(vec![("test.com", taken())]));
    sweep("test", &universe, None, first, &config(dir.path()))
        .await
        .unwrap();
    let pending = tld_sweep::reconcile::load_unchecked(&layout).unwrap();
    assert_eq!(pending, vec!["xyz"]);

    // Second pass: only .xyz is looked up, and now it answers.
    let second = Arc::new(CannedLookup::new(vec![("test.com", taken()), ("test.xyz", free())]));
    let report = sweep("test", &universe, Some(&pending), second.clone(), &config(dir.path()))
        .await
        .unwrap();

    assert_eq!(second.calls_for("test.com"), 0);
    assert_eq!(second.calls_for("test.xyz"), 1);
    assert!(report.reconciliation.unchecked.is_empty());
    assert_eq!(
        std::fs::read_to_string(layout.available_path("test")).unwrap(),
        "test.xyz\n"
    );
    assert_eq!(std::fs::read_to_string(layout.unchecked_path()).unwrap(), "");
}

#[tokio::test]
async fn test_invalid_word_does_no_work() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let universe = vec!["com".to_string()];

    for word in ["abc123", "ABC", "", "a b"] {
        let lookup = Arc::new(CannedLookup::new(vec![]));
        let err = sweep(word, &universe, None, lookup.clone(), &config(&out))
            .await
            .unwrap_err();

        assert!(matches!(err, SweepError::Validation { .. }));
        assert_eq!(lookup.total_calls.load(Ordering::SeqCst), 0);
    }
    assert!(!out.exists());
}

#[test]
fn test_default_config() {
    let config = SweepConfig::default();
    assert!(config.workers >= 1);
    assert_eq!(config.retry, RetryPolicy::default());
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.tld_file, std::path::PathBuf::from("tlds.txt"));
    assert!(config.show_progress);
}

#[test]
fn test_library_initialization() {
    let result = tld_sweep::init();
    assert!(result.is_ok());
}
