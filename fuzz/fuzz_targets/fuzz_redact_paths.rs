//! Fuzz target for BLAKE3 path-hash redaction (`harvx_redact::paths`).
//!
//! Verifies determinism, fixed hash length, and separator/extension
//! handling invariants with arbitrary path-like input.

#![no_main]
use harvx_redact::paths::{redact_path, short_hash};
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let hash = short_hash(input);
    assert_eq!(hash.len(), 16, "short_hash must produce exactly 16 characters");
    assert!(
        hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()),
        "short_hash must produce lowercase hex, got: {hash}"
    );
    assert_eq!(hash, short_hash(input), "short_hash must be deterministic");

    let unix_path = input.replace('\\', "/");
    let windows_path = input.replace('/', "\\");
    assert_eq!(
        short_hash(&unix_path),
        short_hash(&windows_path),
        "short_hash must normalize path separators"
    );

    let redacted = redact_path(input);
    assert_eq!(redacted, redact_path(input), "redact_path must be deterministic");
    assert_eq!(
        redact_path(&unix_path),
        redact_path(&windows_path),
        "redact_path must normalize path separators"
    );

    let ext = std::path::Path::new(&unix_path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    if ext.is_empty() {
        assert!(!redacted.contains('.'), "no extension means no dot in the redacted form");
    } else {
        assert!(redacted.ends_with(&format!(".{ext}")), "extension must be preserved");
    }
});
