//! Domain availability checking module

pub mod checker;
pub mod classifier;
pub mod validator;

// Re-export main functionality
pub use checker::DomainChecker;
pub use classifier::is_available;
pub use validator::validate_word;

use crate::error::Result;
use crate::types::WhoisRecord;
use async_trait::async_trait;

/// A registration lookup service (WHOIS or a stand-in for it)
#[async_trait]
pub trait RegistrationLookup: Send + Sync {
    /// Query the registration record for a fully-qualified domain
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord>;

    /// Get the method name
    fn method_name(&self) -> &'static str;
}

/// Build the candidate domain `<word>.<tld>`
pub fn candidate_domain(word: &str, tld: &str) -> String {
    format!("{}.{}", word, tld)
}

/// The TLD a recorded domain line belongs to: everything after the last dot.
pub fn tld_of(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}
