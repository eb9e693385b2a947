use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error details embedded in a failed [`ResponseEnvelope`]. Carries a
/// plain string code rather than coupling this crate to any particular
/// error enum, since the envelope is consumed by `--json` callers
/// (scripts, editor integrations) who only ever see its JSON shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelopeDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Stable `{"ok": bool, "data": ..., "error": ...}` envelope for the
/// `--json` preview mode, structurally identical to the teacher's FFI
/// response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelopeDetails>,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn success(data: Value) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorEnvelopeDetails { code: code.into(), message: message.into(), details: None }),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
