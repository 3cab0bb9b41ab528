//! Canonicalization helpers shared across transformers.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Flatten one level of nesting and keep only non-empty strings, in source
/// order. Provider tag arrays are mixed-typed on the wire, so this takes
/// loose JSON values.
pub fn sanitize_tags(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };

    let mut tags = Vec::new();
    for item in items {
        match item {
            Value::String(text) if !text.is_empty() => tags.push(text.clone()),
            Value::Array(inner) => {
                for nested in inner {
                    if let Value::String(text) = nested {
                        if !text.is_empty() {
                            tags.push(text.clone());
                        }
                    }
                }
            }
            _ => {}
        }
    }
    tags
}

/// Lowercased, hyphen-separated slug of a title.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Deterministic ID for providers without a stable one: title slug plus a
/// digest of the fields that survive re-fetches, so the same posting maps
/// to the same ID on every fetch.
pub fn stable_fallback_id(company: &str, title: &str, path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(company.as_bytes());
    hasher.update([0x1f]);
    hasher.update(title.as_bytes());
    hasher.update([0x1f]);
    hasher.update(path.as_bytes());
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(16);
    for byte in &digest[..8] {
        hex.push_str(&format!("{byte:02x}"));
    }
    format!("{}-{}", slugify(title), hex)
}

/// Parse an ISO-8601 instant with an offset or `Z` suffix.
pub fn parse_iso_instant(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}
