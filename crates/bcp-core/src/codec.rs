//! Structured-field codec
//!
//! Site lists and dependency lists live in a single TEXT column per row.
//! Historical rows may predate a field or hold corrupted content, so
//! decoding never fails: anything unreadable becomes an empty sequence.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a sequence into its persisted text form.
///
/// An empty slice encodes as `"[]"`, and so does anything that fails to
/// serialize.
pub fn encode<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to encode structured field, storing empty list");
        "[]".to_string()
    })
}

/// Parse a persisted text blob back into a sequence.
///
/// Absent, empty, or malformed input yields an empty vector.
pub fn decode<T: DeserializeOwned>(raw: Option<&str>) -> Vec<T> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Vec::new(),
    };

    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, "malformed structured field, treating as empty");
            Vec::new()
        }
    }
}
