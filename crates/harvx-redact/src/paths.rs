//! Path-hash redaction, carried over from the BLAKE3 path hashing the
//! teacher's receipts used, for obscuring excluded-path strings that
//! still need to show up in logs and the `.meta.json` sidecar.

use std::path::Path;

fn clean_path(s: &str) -> String {
    let mut normalized = s.replace('\\', "/");
    while let Some(stripped) = normalized.strip_prefix("./") {
        normalized = stripped.to_string();
    }
    while normalized.contains("/./") {
        normalized = normalized.replace("/./", "/");
    }
    if normalized.ends_with("/.") {
        normalized.truncate(normalized.len() - 2);
    }
    normalized
}

/// Short (16-character) BLAKE3 hash of a string, with path separators and
/// redundant `.` segments normalized first so logically identical paths
/// hash identically regardless of platform.
#[must_use]
pub fn short_hash(s: &str) -> String {
    let cleaned = clean_path(s);
    let mut hex = blake3::hash(cleaned.as_bytes()).to_hex().to_string();
    hex.truncate(16);
    hex
}

/// Redacts a path to its hash, preserving the final extension so the
/// redacted form still signals file type.
#[must_use]
pub fn redact_path(path: &str) -> String {
    let cleaned = clean_path(path);
    let ext = Path::new(&cleaned)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    let mut out = short_hash(&cleaned);
    if !ext.is_empty() {
        out.push('.');
        out.push_str(ext);
    }
    out
}
