//! # harvx-core
//!
//! **Tier 0 (Orchestrator)**
//!
//! The single pipeline entrypoint ([`orchestrator::run`]) and the
//! structured [`error::HarvxError`]/[`error::ErrorCode`] type every
//! fatal failure surfaces through. Wires every stage crate
//! (`harvx-walk`, `harvx-tier`, `harvx-redact`, `harvx-tokenize`,
//! `harvx-compress`, `harvx-budget`, `harvx-render`, `harvx-write`,
//! `harvx-report`) into the single unidirectional pipeline spec.md §2
//! describes, under one `CancellationToken`.

mod error;
mod orchestrator;

pub use error::{ErrorCode, HarvxError};
pub use orchestrator::{run, PipelineOutcome, CANCELLED_EXIT_CODE};
