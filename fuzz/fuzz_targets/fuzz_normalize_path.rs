#![no_main]
use harvx_path::{ancestor_dirs, normalize_rel_path, normalize_slashes};
use libfuzzer_sys::fuzz_target;

/// Max input size to prevent pathological parse times.
const MAX_INPUT_SIZE: usize = 4 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let normalized = normalize_slashes(s);
    assert!(!normalized.contains('\\'), "normalize_slashes must strip all backslashes");
    assert_eq!(normalized, normalize_slashes(&normalized), "normalize_slashes must be idempotent");

    let rel = normalize_rel_path(s);
    assert!(!rel.contains('\\'), "normalize_rel_path must strip all backslashes");
    assert_eq!(rel, normalize_rel_path(&rel), "normalize_rel_path must be idempotent");

    let _ = ancestor_dirs(&rel);
});
