//! # harvx-report
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! The artifacts the orchestrator produces alongside the rendered
//! document: the `.meta.json` sidecar, the redaction report
//! (JSON/text), and the envelope the `--json` preview mode prints to
//! stdout. None of these write to disk themselves except
//! [`write_meta_sidecar`]/[`write_redaction_report`] — everything else
//! is pure construction, so the orchestrator controls exactly when I/O
//! happens.

mod envelope;
mod redaction_report;
mod sidecar;

pub use envelope::{ErrorEnvelopeDetails, ResponseEnvelope};
pub use redaction_report::{
    build_redaction_report, render_redaction_report, resolve_redaction_report_path,
};
pub use sidecar::{build_meta_sidecar, sidecar_path_for, write_meta_sidecar};
