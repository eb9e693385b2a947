//! # harvx-tokenize
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! Token and line counting for the `harvx` context-packaging pipeline.
//! `count_tokens` is invoked once per file after redaction, and again by
//! `harvx-budget` when a file's content is truncated to fit the budget.

use std::sync::OnceLock;

use anyhow::{Context, Result};
use harvx_types::Tokenizer;
use tiktoken_rs::CoreBPE;

/// Approximate characters per token used by the `none` encoding, which
/// counts code points divided by this fixed constant rather than running
/// a real BPE tokenizer.
pub const NONE_CHARS_PER_TOKEN: f64 = 4.0;

fn cl100k() -> &'static CoreBPE {
    static CELL: OnceLock<CoreBPE> = OnceLock::new();
    CELL.get_or_init(|| tiktoken_rs::cl100k_base().expect("cl100k_base ranks are bundled"))
}

fn o200k() -> &'static CoreBPE {
    static CELL: OnceLock<CoreBPE> = OnceLock::new();
    CELL.get_or_init(|| tiktoken_rs::o200k_base().expect("o200k_base ranks are bundled"))
}

fn bpe_for(tokenizer: Tokenizer) -> Option<&'static CoreBPE> {
    match tokenizer {
        Tokenizer::Cl100kBase => Some(cl100k()),
        Tokenizer::O200kBase => Some(o200k()),
        Tokenizer::None => None,
    }
}

/// Counts tokens in `content` under `tokenizer`. The `none` encoding
/// never fails; the BPE encodings never fail either (they tokenize
/// arbitrary byte sequences), so this cannot error in practice, but
/// keeps a `Result` return to match the fallible-by-convention shape of
/// the surrounding pipeline stages.
#[must_use]
pub fn count_tokens(content: &str, tokenizer: Tokenizer) -> usize {
    match bpe_for(tokenizer) {
        Some(bpe) => bpe.encode_with_special_tokens(content).len(),
        None => ((content.chars().count() as f64) / NONE_CHARS_PER_TOKEN).ceil() as usize,
    }
}

/// Counts lines in `content`, maintained alongside the token count for
/// density reporting. Empty content has zero lines.
#[must_use]
pub fn count_lines(content: &str) -> usize {
    if content.is_empty() {
        0
    } else {
        content.lines().count()
    }
}

/// Truncates `content` at the largest line boundary whose prefix token
/// count is `<= max_tokens`, appending a truncation marker. Returns the
/// truncated content plus its recomputed token count (including the
/// marker). `max_tokens == 0` returns just the marker.
///
/// Binary-searches over line boundaries rather than tokenizing every
/// prefix, since `count_tokens` on the BPE encodings re-scans from the
/// start each call.
pub fn truncate_to_budget(
    content: &str,
    tokenizer: Tokenizer,
    max_tokens: usize,
    total_tokens: usize,
) -> (String, usize) {
    let lines: Vec<&str> = content.lines().collect();
    if lines.is_empty() || max_tokens == 0 {
        let marker = truncation_marker(0, total_tokens);
        return (marker.clone(), count_tokens(&marker, tokenizer));
    }

    let mut lo = 0usize;
    let mut hi = lines.len();
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        let prefix = lines[..mid].join("\n");
        if count_tokens(&prefix, tokenizer) <= max_tokens {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    let prefix = lines[..lo].join("\n");
    let marker = truncation_marker(count_tokens(&prefix, tokenizer), total_tokens);
    let truncated = if prefix.is_empty() {
        marker.clone()
    } else {
        format!("{prefix}\n{marker}")
    };
    let token_count = count_tokens(&truncated, tokenizer);
    (truncated, token_count)
}

fn truncation_marker(shown: usize, total: usize) -> String {
    format!("<!-- Content truncated: {shown} of {total} tokens shown -->")
}

/// Validates a tokenizer name string accepted from config files, where
/// it arrives as a plain string rather than via `clap::ValueEnum`.
pub fn parse_tokenizer_name(name: &str) -> Result<Tokenizer> {
    match name {
        "cl100k_base" | "cl100k-base" => Ok(Tokenizer::Cl100kBase),
        "o200k_base" | "o200k-base" => Ok(Tokenizer::O200kBase),
        "none" => Ok(Tokenizer::None),
        other => Err(anyhow::anyhow!("unknown tokenizer `{other}`"))
            .context("parsing tokenizer name"),
    }
}
