//! Availability classification of lookup records

use crate::types::WhoisRecord;

/// A domain is available when its registration record carries no data at all.
///
/// Any populated field (registrar, dates, name servers, ...) means someone
/// holds the registration. An empty record is available.
pub fn is_available(record: &WhoisRecord) -> bool {
    record.values().all(|value| value.is_null())
}
