//! # harvx-redact
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! Two concerns under one roof: [`secrets`] is the streaming
//! keyword-prefiltered secret scanner run over file content during the
//! load stage (spec.md §4.5); [`paths`] is the BLAKE3 path-hash
//! redaction used when an excluded or sensitive path string still needs
//! to appear in a log line or the `.meta.json` sidecar without
//! revealing the real path.
//!
//! Whether a file's content is scanned at all — `redaction.enabled` and
//! the `exclude_paths` glob check — is decided by the caller, which
//! already owns a compiled `globset::GlobSet` for the profile's other
//! path patterns; this crate only does the scanning and hashing.

pub mod paths;
pub mod secrets;

pub use secrets::{redact_content, SecretRegistry};
