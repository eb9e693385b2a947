use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use harvx_types::RenderData;

use crate::fence::fence_for;

/// Single-pass Markdown template: header, summary, directory tree, then
/// one section per file in `data.files`' order. Builds the full string
/// in memory (bounded by the already token-budgeted file set) before
/// one `write_all`, mirroring the teacher's `render_*_md` helpers.
pub fn render_markdown_to<W: Write>(mut out: W, data: &RenderData) -> Result<()> {
    let mut s = String::new();
    write_header(&mut s, data);
    write_summary(&mut s, data);
    write_directory_tree(&mut s, data);
    write_files(&mut s, data);
    out.write_all(s.as_bytes())?;
    Ok(())
}

fn write_header(s: &mut String, data: &RenderData) {
    let _ = writeln!(s, "# {}", data.project_name);
    let _ = writeln!(s);
    let _ = writeln!(s, "- Generated: {}", data.generated_at);
    let _ = writeln!(s, "- Content hash: {}", data.content_hash_placeholder);
    let _ = writeln!(s, "- Profile: {}", data.profile_name);
    let _ = writeln!(s, "- Tokenizer: {:?}", data.tokenizer);
    let _ = writeln!(s, "- Total tokens: {}", data.total_tokens);
    let _ = writeln!(s);
}

fn write_summary(s: &mut String, data: &RenderData) {
    let _ = writeln!(s, "## Summary");
    let _ = writeln!(s);
    let _ = writeln!(s, "|Tier|Files|Tokens|");
    let _ = writeln!(s, "|---:|---:|---:|");
    for tier in &data.tier_summary {
        let _ = writeln!(s, "|{}|{}|{}|", tier.tier, tier.files, tier.tokens);
    }
    let _ = writeln!(s);

    if !data.top_files.is_empty() {
        let _ = writeln!(s, "### Top files by tokens");
        let _ = writeln!(s);
        let _ = writeln!(s, "|Path|Tokens|");
        let _ = writeln!(s, "|---|---:|");
        for (path, tokens) in &data.top_files {
            let _ = writeln!(s, "|{path}|{tokens}|");
        }
        let _ = writeln!(s);
    }

    let _ = writeln!(s, "### Redaction summary");
    let _ = writeln!(s);
    let _ = writeln!(s, "Total matches: {}", data.redaction_summary.total_matches);
    if !data.redaction_summary.by_secret_type.is_empty() {
        let mut types: Vec<_> = data.redaction_summary.by_secret_type.iter().collect();
        types.sort_by_key(|(k, _)| k.to_string());
        for (secret_type, count) in types {
            let _ = writeln!(s, "- {secret_type}: {count}");
        }
    }
    let _ = writeln!(s);

    if let Some(heatmap) = &data.heatmap {
        let _ = writeln!(s, "### Heatmap");
        let _ = writeln!(s);
        let _ = writeln!(s, "|Tier|Files|Tokens|");
        let _ = writeln!(s, "|---:|---:|---:|");
        for tier in heatmap {
            let _ = writeln!(s, "|{}|{}|{}|", tier.tier, tier.files, tier.tokens);
        }
        let _ = writeln!(s);
    }
}

fn write_directory_tree(s: &mut String, data: &RenderData) {
    let _ = writeln!(s, "## Directory tree");
    let _ = writeln!(s);
    let _ = writeln!(s, "```");
    let _ = writeln!(s, "{}", data.directory_tree);
    let _ = writeln!(s, "```");
    let _ = writeln!(s);
}

fn write_files(s: &mut String, data: &RenderData) {
    let _ = writeln!(s, "## Files");
    let _ = writeln!(s);
    for file in &data.files {
        let _ = writeln!(s, "### {}", file.path);
        let _ = writeln!(s);
        let _ = writeln!(s, "- Size: {} bytes", file.size);
        let _ = writeln!(s, "- Tier: {}", file.tier);
        let _ = writeln!(s, "- Tokens: {}", file.token_count);
        if file.is_compressed {
            let _ = writeln!(s, "- Compressed: yes");
        }
        if file.truncated {
            let _ = writeln!(s, "- Truncated: yes");
        }
        let _ = writeln!(s);

        let fence = fence_for(&file.content);
        let _ = writeln!(s, "{fence}{}", file.language);
        if data.line_numbers {
            for (i, line) in file.content.lines().enumerate() {
                let _ = writeln!(s, "{:>5} | {}", i + 1, line);
            }
        } else {
            let _ = write!(s, "{}", file.content);
            if !file.content.ends_with('\n') {
                let _ = writeln!(s);
            }
        }
        let _ = writeln!(s, "{fence}");
        let _ = writeln!(s);
    }
}
