use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use harvx_types::{FileDescriptor, Format, MetaFileEntry, MetaSidecar, PipelineSummary, Tokenizer, SCHEMA_VERSION};

/// Builds the `.meta.json` sidecar document from the final, budget-enforced
/// file list and the run's aggregate summary. Field order matches the
/// struct's declaration order, so `serde_json` serialization is
/// deterministic without needing the `preserve_order` feature.
#[must_use]
pub fn build_meta_sidecar(
    files: &[FileDescriptor],
    summary: &PipelineSummary,
    profile: String,
    tokenizer: Tokenizer,
    format: Format,
    content_hash: Option<String>,
    generated_at: String,
) -> MetaSidecar {
    let entries = files
        .iter()
        .map(|fd| MetaFileEntry {
            path: fd.path.clone(),
            tier: fd.tier,
            tokens: fd.token_count,
            size: fd.size,
            is_compressed: fd.is_compressed,
            redactions: fd.redactions.len(),
        })
        .collect();

    MetaSidecar {
        schema_version: SCHEMA_VERSION,
        profile,
        tokenizer,
        format,
        content_hash,
        generated_at,
        files: entries,
        summary: summary.clone(),
    }
}

/// `<output_path>.meta.json`, placing the sidecar next to the rendered
/// artifact without touching its own extension.
#[must_use]
pub fn sidecar_path_for(output_path: &Path) -> PathBuf {
    let mut name = output_path.as_os_str().to_os_string();
    name.push(".meta.json");
    PathBuf::from(name)
}

/// Writes the sidecar as pretty-printed JSON. Not atomic: a sidecar is
/// a diagnostic artifact, not the document of record the writer's
/// temp-file-then-rename discipline protects.
pub fn write_meta_sidecar(path: &Path, sidecar: &MetaSidecar) -> Result<()> {
    let json = serde_json::to_string_pretty(sidecar)?;
    std::fs::write(path, json).with_context(|| format!("failed to write sidecar: {}", path.display()))
}
