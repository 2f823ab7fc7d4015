//! tld-sweep - check one word's domain availability across every TLD
//!
//! Looks up `<word>.<tld>` over WHOIS for every TLD IANA knows about, appends
//! each decided domain to a per-word outcome file, and finishes by listing the
//! TLDs that could not be checked so a retry pass can target just those.

pub mod dispatch;
pub mod domain;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod store;
pub mod sweep;
pub mod tlds;
pub mod types;
pub mod whois;

// Re-export commonly used types
pub use error::{Result, SweepError};
pub use types::{
    MetricsSnapshot, Outcome, PerformanceMetrics, RetryPolicy, SweepConfig, SweepSummary,
    TaskReport, WhoisRecord,
};

// Re-export main functionality
pub use dispatch::Dispatcher;
pub use domain::{is_available, validate_word, DomainChecker, RegistrationLookup};
pub use reconcile::{reconcile, ReconciliationReport};
pub use store::{FileOutcomeStore, OutcomeStore, OutputLayout};
pub use sweep::{sweep, SweepReport};
pub use whois::WhoisClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
