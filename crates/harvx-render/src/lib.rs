//! # harvx-render
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! Single-pass, streaming Markdown/XML rendering of a fully assembled
//! [`RenderData`], per spec.md §4.7. Each format writes directly to the
//! supplied `Writer` (grounded on `tokmd-format`'s `render_to<W: Write>`
//! dispatch shape); the directory-tree builder is exposed separately so
//! the orchestrator can compute it once before constructing
//! `RenderData`, keeping the renderer itself free of any input beyond
//! what it's handed.

mod fence;
mod markdown;
mod tree;
mod xml;

use anyhow::Result;
use harvx_types::{Format, RenderData};

pub use markdown::render_markdown_to;
pub use tree::render_directory_tree;
pub use xml::render_xml_to;

/// Dispatches to the Markdown or XML renderer by `format`.
pub fn render_to<W: std::io::Write>(out: W, format: Format, data: &RenderData) -> Result<()> {
    match format {
        Format::Markdown => render_markdown_to(out, data),
        Format::Xml => render_xml_to(out, data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvx_types::{RedactionSummary, RenderFileEntry, TierSummary, Tokenizer};

    fn minimal_data() -> RenderData {
        RenderData {
            project_name: "p".to_string(),
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            content_hash_placeholder: "0".repeat(64),
            profile_name: "generic".to_string(),
            tokenizer: Tokenizer::None,
            total_tokens: 0,
            files: vec![RenderFileEntry {
                path: "a.txt".to_string(),
                size: 0,
                tier: 2,
                language: String::new(),
                token_count: 0,
                line_count: 0,
                content: String::new(),
                is_compressed: false,
                truncated: false,
            }],
            directory_tree: "a.txt".to_string(),
            tier_summary: vec![TierSummary { tier: 2, files: 1, tokens: 0 }],
            top_files: vec![],
            redaction_summary: RedactionSummary::default(),
            heatmap: None,
            line_numbers: false,
        }
    }

    #[test]
    fn dispatches_markdown() {
        let mut buf = Vec::new();
        render_to(&mut buf, Format::Markdown, &minimal_data()).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with("# p\n"));
    }

    #[test]
    fn dispatches_xml() {
        let mut buf = Vec::new();
        render_to(&mut buf, Format::Xml, &minimal_data()).unwrap();
        assert!(String::from_utf8(buf).unwrap().starts_with("<?xml"));
    }
}
