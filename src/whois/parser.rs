//! Raw WHOIS text to structured record

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::types::WhoisRecord;

/// Every record carries exactly these fields, `null` when not reported.
pub const RECORD_FIELDS: &[&str] = &[
    "domain_name",
    "registrar",
    "whois_server",
    "referral_url",
    "updated_date",
    "creation_date",
    "expiration_date",
    "name_servers",
    "status",
    "emails",
    "dnssec",
    "name",
    "org",
    "address",
    "city",
    "state",
    "country",
];

/// Responses registries send for names nobody holds
const NOT_FOUND_PATTERNS: &[&str] = &[
    "no match",
    "not found",
    "no data found",
    "no entries found",
    "domain not found",
    "domain available",
    "status: available",
    "status: free",
    "not registered",
    "no matching record",
    "no object found",
    "the queried object does not exist",
    "object does not exist",
    "this domain name has not been registered",
    "available for registration",
];

#[derive(Clone, Copy)]
enum FieldKind {
    Text,
    Date,
    List,
}

/// Line labels feeding each field, matched against the start of a lowercased line
const FIELD_LABELS: &[(&str, FieldKind, &[&str])] = &[
    ("domain_name", FieldKind::Text, &["domain name:", "domain:"]),
    (
        "registrar",
        FieldKind::Text,
        &["registrar:", "registrar name:", "sponsoring registrar:"],
    ),
    (
        "whois_server",
        FieldKind::Text,
        &["registrar whois server:", "whois server:"],
    ),
    ("referral_url", FieldKind::Text, &["registrar url:", "referral url:"]),
    (
        "updated_date",
        FieldKind::Date,
        &["updated date:", "last updated:", "last-update:", "last modified:", "changed:"],
    ),
    (
        "creation_date",
        FieldKind::Date,
        &["creation date:", "created:", "created on:", "registered:", "registration time:"],
    ),
    (
        "expiration_date",
        FieldKind::Date,
        &[
            "registry expiry date:",
            "registrar registration expiration date:",
            "expiration date:",
            "expiry date:",
            "expire date:",
            "expires:",
            "paid-till:",
        ],
    ),
    ("name_servers", FieldKind::List, &["name server:", "nameserver:", "nserver:"]),
    ("status", FieldKind::List, &["domain status:", "status:", "state:"]),
    ("dnssec", FieldKind::Text, &["dnssec:"]),
    ("name", FieldKind::Text, &["registrant name:"]),
    (
        "org",
        FieldKind::Text,
        &["registrant organization:", "registrant organisation:", "org:"],
    ),
    ("address", FieldKind::Text, &["registrant street:"]),
    ("city", FieldKind::Text, &["registrant city:"]),
    ("state", FieldKind::Text, &["registrant state/province:"]),
    ("country", FieldKind::Text, &["registrant country:"]),
];

/// A record with every field set to null
pub fn empty_record() -> WhoisRecord {
    RECORD_FIELDS
        .iter()
        .map(|field| (field.to_string(), Value::Null))
        .collect()
}

/// Whether the response says the domain is not registered
pub fn is_not_found(output: &str) -> bool {
    let lower = output.to_lowercase();
    NOT_FOUND_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Parse a raw WHOIS response into a record.
///
/// A "not found" style response yields an all-null record.
pub fn parse_whois_response(output: &str) -> WhoisRecord {
    let mut record = empty_record();
    if is_not_found(output) {
        return record;
    }

    let lines: Vec<(String, &str)> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('%') && !line.starts_with('#'))
        .map(|line| (line.to_lowercase(), line))
        .collect();

    for (field, kind, labels) in FIELD_LABELS {
        let values = collect_values(&lines, labels);
        if values.is_empty() {
            continue;
        }

        let value = match kind {
            FieldKind::Text => Value::String(values[0].clone()),
            FieldKind::Date => normalize_date(&values[0]),
            FieldKind::List => {
                let lowercase = *field == "name_servers";
                let mut items: Vec<String> = Vec::new();
                for v in values {
                    let v = if lowercase { v.to_lowercase() } else { v };
                    if !items.contains(&v) {
                        items.push(v);
                    }
                }
                Value::Array(items.into_iter().map(Value::String).collect())
            }
        };
        record.insert(field.to_string(), value);
    }

    let emails = extract_emails(lines.iter().map(|(_, line)| *line));
    if !emails.is_empty() {
        record.insert(
            "emails".to_string(),
            Value::Array(emails.into_iter().map(Value::String).collect()),
        );
    }

    record
}

fn collect_values(lines: &[(String, &str)], labels: &[&str]) -> Vec<String> {
    lines
        .iter()
        .filter(|(lower, _)| labels.iter().any(|label| lower.starts_with(label)))
        .filter_map(|(_, line)| line.splitn(2, ':').nth(1))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

/// Addresses on data lines; registry notices in comment lines are not registration data
fn extract_emails<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    let Ok(pattern) = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+") else {
        return Vec::new();
    };

    let mut emails: Vec<String> = Vec::new();
    for line in lines {
        for m in pattern.find_iter(line) {
            let email = m.as_str().to_lowercase();
            if !emails.contains(&email) {
                emails.push(email);
            }
        }
    }
    emails
}

/// Normalize a registry date to RFC 3339 when it is in a known format
fn normalize_date(raw: &str) -> Value {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Value::String(dt.with_timezone(&Utc).to_rfc3339());
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S UTC",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y.%m.%d %H:%M:%S",
    ];
    for format in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Value::String(dt.and_utc().to_rfc3339());
        }
    }

    let date_formats = ["%Y-%m-%d", "%d-%b-%Y", "%d.%m.%Y", "%Y.%m.%d", "%Y/%m/%d"];
    for format in &date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return Value::String(dt.and_utc().to_rfc3339());
            }
        }
    }

    Value::String(raw.to_string())
}
