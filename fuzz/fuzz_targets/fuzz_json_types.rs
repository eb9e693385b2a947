//! Fuzz target for JSON deserialization of the pipeline's wire types.
//!
//! Tests `PipelineSummary`, `MetaSidecar`, and `RenderFileEntry`
//! deserialization from arbitrary JSON input — these are exactly the
//! shapes `--json` consumers and `.meta.json` readers feed back in.

#![no_main]
use harvx_types::{MetaSidecar, PipelineSummary, RenderFileEntry};
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 64 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_SIZE {
        return;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(summary) = serde_json::from_str::<PipelineSummary>(s) {
        let _ = summary.total_included;
        let _ = summary.budget_remaining;
    }
    if let Ok(sidecar) = serde_json::from_str::<MetaSidecar>(s) {
        let _ = sidecar.files.len();
        let _ = sidecar.schema_version;
    }
    if let Ok(entry) = serde_json::from_str::<RenderFileEntry>(s) {
        let _ = entry.path.len();
        let _ = entry.token_count;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(s) {
        let _ = serde_json::from_value::<PipelineSummary>(value.clone());
        let _ = serde_json::from_value::<MetaSidecar>(value);
    }
});
