//! Central WHOIS server registry.
//!
//! A small static mapping for high-traffic TLDs; everything else is
//! discovered through IANA at runtime.

/// IANA's WHOIS server, authoritative for TLD referrals
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";

/// Standard WHOIS port
pub const WHOIS_PORT: u16 = 43;

/// Get the WHOIS server for a TLD (lowercase, without leading dot).
pub fn whois_server_for_tld(tld: &str) -> Option<&'static str> {
    match tld {
        "com" | "net" => Some("whois.verisign-grs.com"),
        "org" => Some("whois.pir.org"),
        "io" => Some("whois.nic.io"),
        "ai" => Some("whois.nic.ai"),
        "co" => Some("whois.nic.co"),
        "me" => Some("whois.nic.me"),
        "xyz" => Some("whois.nic.xyz"),
        "dev" | "app" => Some("whois.nic.google"),
        "info" => Some("whois.nic.info"),
        "biz" => Some("whois.nic.biz"),
        _ => None,
    }
}

/// Pull the authoritative server out of an IANA TLD response.
///
/// IANA answers with either a `refer:` or a `whois:` line; `refer:` wins when
/// both are present.
pub fn parse_iana_referral(response: &str) -> Option<String> {
    let mut whois_server = None;

    for line in response.lines().map(str::trim) {
        let lower = line.to_lowercase();
        if lower.starts_with("refer:") {
            let server = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            if !server.is_empty() {
                return Some(server.to_lowercase());
            }
        } else if lower.starts_with("whois:") && whois_server.is_none() {
            let server = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            if !server.is_empty() {
                whois_server = Some(server.to_lowercase());
            }
        }
    }

    whois_server
}
