//! Pure Rust WHOIS client (no external `whois` binary required)

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::parser::parse_whois_response;
use super::registry::{parse_iana_referral, whois_server_for_tld, IANA_WHOIS_SERVER, WHOIS_PORT};
use crate::domain::{tld_of, RegistrationLookup};
use crate::error::{Result, SweepError};
use crate::lookup_error;
use crate::types::WhoisRecord;

/// Largest WHOIS response read; real records are a few KiB
pub const MAX_RESPONSE_BYTES: u64 = 1024 * 1024;

/// WHOIS client with per-TLD server discovery
pub struct WhoisClient {
    timeout: Duration,
    port: u16,
    /// TLD -> authoritative server, filled from IANA referrals
    discovered: RwLock<HashMap<String, String>>,
}

impl WhoisClient {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            port: WHOIS_PORT,
            discovered: RwLock::new(HashMap::new()),
        }
    }

    /// Dial a non-standard port (local test servers)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Query the registration record for `domain`
    pub async fn query_domain(&self, domain: &str) -> Result<WhoisRecord> {
        let tld = tld_of(domain).to_lowercase();
        let server = self.server_for_tld(domain, &tld).await?;
        let raw = self.query_whois(&server, domain).await?;

        if raw.trim().is_empty() {
            return Err(lookup_error!(domain, "empty response from {}", server));
        }

        Ok(parse_whois_response(&raw))
    }

    async fn server_for_tld(&self, domain: &str, tld: &str) -> Result<String> {
        if let Some(server) = whois_server_for_tld(tld) {
            return Ok(server.to_string());
        }
        let cached = self.discovered.read().get(tld).cloned();
        if let Some(server) = cached {
            return Ok(server);
        }

        // Unknown TLD: ask IANA for the authoritative WHOIS server.
        let iana = self.query_whois(IANA_WHOIS_SERVER, tld).await?;
        let server = parse_iana_referral(&iana)
            .ok_or_else(|| lookup_error!(domain, "No WHOIS server found for TLD: {}", tld))?;

        tracing::debug!(tld = %tld, server = %server, "Discovered WHOIS server");
        self.discovered
            .write()
            .insert(tld.to_string(), server.clone());

        Ok(server)
    }

    async fn query_whois(&self, server: &str, query: &str) -> Result<String> {
        let secs = self.timeout.as_secs();
        let addr = format!("{}:{}", server, self.port);

        let mut stream = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| SweepError::timeout("WHOIS connect", secs))?
            .map_err(|e| SweepError::network(format!("WHOIS connect failed: {}", e), Some(addr.clone())))?;

        timeout(self.timeout, stream.write_all(format!("{}\r\n", query).as_bytes()))
            .await
            .map_err(|_| SweepError::timeout("WHOIS write", secs))?
            .map_err(|e| SweepError::network(format!("WHOIS write failed: {}", e), Some(addr.clone())))?;

        let mut buf = Vec::new();
        let mut capped = stream.take(MAX_RESPONSE_BYTES);
        timeout(self.timeout, capped.read_to_end(&mut buf))
            .await
            .map_err(|_| SweepError::timeout("WHOIS read", secs))?
            .map_err(|e| SweepError::network(format!("WHOIS read failed: {}", e), Some(addr)))?;

        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistrationLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord> {
        self.query_domain(domain).await
    }

    fn method_name(&self) -> &'static str {
        "whois"
    }
}
