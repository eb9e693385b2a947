//! Fuzz target for `harvx.toml` profile parsing.
//!
//! Tests `parse_config_str` with arbitrary TOML input to find panics or
//! hangs in the deserializer and profile-conversion path, independent
//! of whether the input is valid configuration.

#![no_main]
use harvx_config::parse_config_str;
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_config_str(s);
    }
});
