use anyhow::{Context, Result};

use crate::mix::CanonicalEntry;

/// Serializes the canonical entry list as a JSON array.
///
/// Unlike the XML formats this is a direct projection of the entries:
/// every field appears, absent values as `null`, timestamps in RFC 3339.
pub fn write(entries: &[CanonicalEntry]) -> Result<String> {
    serde_json::to_string(entries).context("Failed to serialize entries as JSON")
}
