//! WHOIS lookups over TCP/43.
//!
//! Keeps WHOIS server knowledge and response parsing in one place so the
//! checker only ever sees a structured [`WhoisRecord`](crate::types::WhoisRecord).

pub mod client;
pub mod parser;
pub mod registry;

pub use client::WhoisClient;
pub use parser::{parse_whois_response, RECORD_FIELDS};
