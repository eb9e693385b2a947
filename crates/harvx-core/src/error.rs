//! Structured, FFI-friendly error type for the orchestrator boundary.
//!
//! Mirrors the teacher's `code` + `message` + `details` + `suggestions`
//! error shape so `--json`-mode callers get the same stable,
//! machine-parseable failure reporting as every other surface in this
//! pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, snake_case-on-the-wire error codes for every fatal failure
/// mode the orchestrator can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The walk root doesn't exist or isn't a directory.
    PathNotFound,
    /// Config file present but malformed, or an unknown `--profile` was named.
    ConfigInvalid,
    /// The directory walk itself failed (not a per-file error).
    WalkFailed,
    /// Writing the rendered artifact (or a sidecar/report) failed.
    WriteFailed,
    /// `--assert-include` matched zero included files.
    AssertIncludeFailed,
    /// `--fail-on-redaction` tripped; the artifact was already written.
    RedactionPolicyTripped,
    /// A subcommand not wired to the core pipeline was invoked.
    NotImplemented,
    /// Any other unexpected failure.
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::PathNotFound => "path_not_found",
            ErrorCode::ConfigInvalid => "config_invalid",
            ErrorCode::WalkFailed => "walk_failed",
            ErrorCode::WriteFailed => "write_failed",
            ErrorCode::AssertIncludeFailed => "assert_include_failed",
            ErrorCode::RedactionPolicyTripped => "redaction_policy_tripped",
            ErrorCode::NotImplemented => "not_implemented",
            ErrorCode::InternalError => "internal_error",
        };
        write!(f, "{s}")
    }
}

/// Structured error carried from a failed pipeline run to the CLI's
/// exit-code mapping and, in `--json` mode, to stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvxError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl HarvxError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: None, suggestions: None }
    }

    #[must_use]
    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: Some(details.into()), suggestions: None }
    }

    #[must_use]
    pub fn with_suggestions(code: ErrorCode, message: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self { code, message: message.into(), details: None, suggestions: Some(suggestions) }
    }

    #[must_use]
    pub fn path_not_found(path: &str) -> Self {
        Self::with_suggestions(
            ErrorCode::PathNotFound,
            format!("path not found: {path}"),
            vec!["check the path spelling".to_string(), "verify the directory exists".to_string()],
        )
    }

    #[must_use]
    pub fn config_invalid(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::ConfigInvalid, format!("invalid configuration: {reason}"))
    }

    #[must_use]
    pub fn walk_failed(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::WalkFailed, format!("directory walk failed: {reason}"))
    }

    #[must_use]
    pub fn write_failed(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::WriteFailed, format!("failed to write output: {reason}"))
    }

    #[must_use]
    pub fn assert_include_failed(pattern: &str) -> Self {
        Self::with_details(
            ErrorCode::AssertIncludeFailed,
            "assert-include matched no files",
            format!("pattern: {pattern}"),
        )
    }

    #[must_use]
    pub fn redaction_policy_tripped(count: usize) -> Self {
        Self::with_details(
            ErrorCode::RedactionPolicyTripped,
            "redaction occurred and --fail-on-redaction is set",
            format!("{count} match(es); artifact was still written"),
        )
    }

    #[must_use]
    pub fn not_implemented(feature: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotImplemented, feature)
    }

    #[must_use]
    pub fn internal(reason: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("internal error: {reason}"))
    }

    /// The process exit code this error maps to, per the exit code
    /// table: config/setup and write failures are always fatal (1);
    /// `--assert-include`/`--fail-on-redaction` are also 1 but only
    /// raised after a successful write.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for HarvxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {}: {}", self.code, self.message, details),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for HarvxError {}

impl From<anyhow::Error> for HarvxError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_bracketed_code() {
        let err = HarvxError::new(ErrorCode::WalkFailed, "boom");
        assert_eq!(err.to_string(), "[walk_failed] boom");
    }

    #[test]
    fn display_appends_details_when_present() {
        let err = HarvxError::assert_include_failed("**/*.rs");
        assert!(err.to_string().contains("pattern: **/*.rs"));
    }

    #[test]
    fn error_codes_serialize_snake_case() {
        let err = HarvxError::not_implemented("brief");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"code\":\"not_implemented\""));
    }

    #[test]
    fn anyhow_error_converts_to_internal() {
        let any_err: anyhow::Error = anyhow::anyhow!("disk full");
        let err: HarvxError = any_err.into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn every_error_maps_to_exit_one() {
        assert_eq!(HarvxError::path_not_found("/x").exit_code(), 1);
        assert_eq!(HarvxError::redaction_policy_tripped(3).exit_code(), 1);
    }
}
