//! Fuzz target for the `--max-tokens` budget string parser.
//!
//! `parse_budget` must never panic on arbitrary input; it either
//! returns a valid `usize` or a descriptive error.

#![no_main]
use harvx_budget::parse_budget;
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_budget(s);
    }
});
