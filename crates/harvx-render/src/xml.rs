use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use harvx_types::RenderData;

/// Single-pass XML template, structurally parallel to
/// [`crate::markdown::render_markdown_to`]: header attributes, a
/// `<summary>` block, a CDATA-wrapped directory tree, then one
/// `<file>` element per entry with its content in CDATA so source
/// text never has to be character-escaped.
pub fn render_xml_to<W: Write>(mut out: W, data: &RenderData) -> Result<()> {
    let mut s = String::new();
    let _ = writeln!(s, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        s,
        r#"<harvx project="{}" generatedAt="{}" contentHash="{}" profile="{}" tokenizer="{:?}" totalTokens="{}">"#,
        escape_attr(&data.project_name),
        escape_attr(&data.generated_at),
        escape_attr(&data.content_hash_placeholder),
        escape_attr(&data.profile_name),
        data.tokenizer,
        data.total_tokens,
    );

    write_summary(&mut s, data);
    write_directory_tree(&mut s, data);
    write_files(&mut s, data);

    let _ = writeln!(s, "</harvx>");
    out.write_all(s.as_bytes())?;
    Ok(())
}

fn write_summary(s: &mut String, data: &RenderData) {
    let _ = writeln!(s, "  <summary>");
    for tier in &data.tier_summary {
        let _ = writeln!(
            s,
            r#"    <tier number="{}" files="{}" tokens="{}"/>"#,
            tier.tier, tier.files, tier.tokens
        );
    }
    if !data.top_files.is_empty() {
        let _ = writeln!(s, "    <topFiles>");
        for (path, tokens) in &data.top_files {
            let _ = writeln!(s, r#"      <file path="{}" tokens="{}"/>"#, escape_attr(path), tokens);
        }
        let _ = writeln!(s, "    </topFiles>");
    }
    let _ = writeln!(
        s,
        r#"    <redaction totalMatches="{}">"#,
        data.redaction_summary.total_matches
    );
    let mut types: Vec<_> = data.redaction_summary.by_secret_type.iter().collect();
    types.sort_by_key(|(k, _)| k.to_string());
    for (secret_type, count) in types {
        let _ = writeln!(
            s,
            r#"      <bySecretType type="{}" count="{}"/>"#,
            escape_attr(secret_type),
            count
        );
    }
    let _ = writeln!(s, "    </redaction>");
    if let Some(heatmap) = &data.heatmap {
        let _ = writeln!(s, "    <heatmap>");
        for tier in heatmap {
            let _ = writeln!(
                s,
                r#"      <tier number="{}" files="{}" tokens="{}"/>"#,
                tier.tier, tier.files, tier.tokens
            );
        }
        let _ = writeln!(s, "    </heatmap>");
    }
    let _ = writeln!(s, "  </summary>");
}

fn write_directory_tree(s: &mut String, data: &RenderData) {
    s.push_str("  <directoryTree>");
    write_cdata(s, &data.directory_tree);
    s.push_str("</directoryTree>\n");
}

fn write_files(s: &mut String, data: &RenderData) {
    let _ = writeln!(s, "  <files>");
    for file in &data.files {
        let _ = writeln!(
            s,
            r#"    <file path="{}" size="{}" tier="{}" tokens="{}" language="{}" compressed="{}" truncated="{}">"#,
            escape_attr(&file.path),
            file.size,
            file.tier,
            file.token_count,
            escape_attr(&file.language),
            file.is_compressed,
            file.truncated,
        );
        s.push_str("      ");
        if data.line_numbers {
            let numbered: String = file
                .content
                .lines()
                .enumerate()
                .map(|(i, line)| format!("{:>5} | {}\n", i + 1, line))
                .collect();
            write_cdata(s, &numbered);
        } else {
            write_cdata(s, &file.content);
        }
        s.push('\n');
        let _ = writeln!(s, "    </file>");
    }
    let _ = writeln!(s, "  </files>");
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wraps `content` in one or more `CDATA` sections, splitting on any
/// `]]>` terminator that would otherwise close the section early.
fn write_cdata(s: &mut String, content: &str) {
    s.push_str("<![CDATA[");
    let mut remaining = content;
    while let Some(idx) = remaining.find("]]>") {
        s.push_str(&remaining[..idx + 2]);
        s.push_str("]]><![CDATA[");
        remaining = &remaining[idx + 2..];
    }
    s.push_str(remaining);
    s.push_str("]]>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvx_types::{RedactionSummary, RenderFileEntry, TierSummary, Tokenizer};
    use std::collections::HashMap;

    fn sample_data() -> RenderData {
        RenderData {
            project_name: "A & B".to_string(),
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            content_hash_placeholder: "0".repeat(64),
            profile_name: "claude".to_string(),
            tokenizer: Tokenizer::O200kBase,
            total_tokens: 7,
            files: vec![RenderFileEntry {
                path: "src/<lib>.rs".to_string(),
                size: 3,
                tier: 0,
                language: "rust".to_string(),
                token_count: 3,
                line_count: 1,
                content: "let x = 1 < 2;".to_string(),
                is_compressed: false,
                truncated: false,
            }],
            directory_tree: "src/\n  lib.rs".to_string(),
            tier_summary: vec![TierSummary { tier: 0, files: 1, tokens: 3 }],
            top_files: vec![],
            redaction_summary: RedactionSummary::default(),
            heatmap: None,
            line_numbers: false,
        }
    }

    #[test]
    fn header_attributes_are_escaped() {
        let data = sample_data();
        let mut buf = Vec::new();
        render_xml_to(&mut buf, &data).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains(r#"project="A &amp; B""#));
    }

    #[test]
    fn file_content_is_verbatim_inside_cdata_not_escaped() {
        let data = sample_data();
        let mut buf = Vec::new();
        render_xml_to(&mut buf, &data).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("<![CDATA[let x = 1 < 2;"));
    }

    #[test]
    fn cdata_terminator_inside_content_is_split_safely() {
        let mut s = String::new();
        write_cdata(&mut s, "before ]]> after");
        assert_eq!(s, "<![CDATA[before ]]]]><![CDATA[> after]]>");
        assert!(!s.contains("]]]]]")); // no section accidentally concatenates two splits
    }

    #[test]
    fn well_formed_root_element_open_and_close() {
        let data = sample_data();
        let mut buf = Vec::new();
        render_xml_to(&mut buf, &data).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.trim_end().ends_with("</harvx>"));
        assert!(text.contains("<harvx "));
    }
}
