//! Page token wire format: colon-separated non-negative integers, with a
//! fixed count per cursor kind.

use crate::error::{Error, Result};

/// Serializes token fields. Integers need no escaping.
pub fn encode(fields: &[u64]) -> String {
    fields
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(":")
}

/// Parses a page token into exactly `expected_arity` integers.
///
/// A wrong field count or a non-integer field fails with
/// [`Error::BadPageToken`] before any field reaches cursor logic.
pub fn decode(token: &str, expected_arity: usize) -> Result<Vec<u64>> {
    let fields: Vec<&str> = token.split(':').collect();
    if fields.len() != expected_arity {
        return Err(Error::BadPageToken(format!(
            "expected {} fields, got {}",
            expected_arity,
            fields.len()
        )));
    }
    fields
        .iter()
        .map(|field| {
            field
                .parse::<u64>()
                .map_err(|_| Error::BadPageToken(format!("non-integer field {field:?}")))
        })
        .collect()
}
