//! Fuzz target for Shannon entropy estimation.
//!
//! `entropy_bits_per_byte` backs the redactor's entropy-threshold gate
//! (spec.md §4.5 step 3) and must never panic and always return a
//! value in `[0.0, 8.0]` regardless of input.

#![no_main]
use harvx_content::entropy_bits_per_byte;
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 256 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let entropy = entropy_bits_per_byte(data);
    assert!(entropy >= 0.0, "entropy must be non-negative");
    assert!(entropy <= 8.0, "entropy must be at most 8 bits per byte");
    assert!(!entropy.is_nan(), "entropy must not be NaN");
    assert_eq!(entropy, entropy_bits_per_byte(data), "entropy must be deterministic");
});
