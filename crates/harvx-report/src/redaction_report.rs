use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use harvx_types::{RedactionMatch, RedactionReport, RedactionReportEntry, SCHEMA_VERSION};

/// Builds the redaction report from every match collected across the
/// run, sorted by `(file, line)` for a stable, reviewable diff between
/// runs.
#[must_use]
pub fn build_redaction_report(matches: &[RedactionMatch], generated_at: String) -> RedactionReport {
    let mut entries: Vec<RedactionReportEntry> = matches
        .iter()
        .map(|m| RedactionReportEntry {
            file: m.file_path.clone(),
            line: m.line_number,
            rule_id: m.rule_id.clone(),
            secret_type: m.secret_type.clone(),
            confidence: m.confidence,
            replacement: m.replacement.clone(),
        })
        .collect();
    entries.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.line.cmp(&b.line)));

    let mut by_secret_type: HashMap<String, usize> = HashMap::new();
    let mut by_confidence: HashMap<String, usize> = HashMap::new();
    for e in &entries {
        *by_secret_type.entry(e.secret_type.clone()).or_insert(0) += 1;
        *by_confidence.entry(format!("{:?}", e.confidence).to_lowercase()).or_insert(0) += 1;
    }

    RedactionReport { schema_version: SCHEMA_VERSION, generated_at, entries, by_secret_type, by_confidence }
}

/// Renders `report` as JSON when `path`'s extension is `.json` or
/// absent, otherwise as a plain-text table — the teacher's
/// by-extension format dispatch, applied here to the report path
/// instead of the main output path.
pub fn render_redaction_report(report: &RedactionReport, path: &Path) -> Result<String> {
    let is_json = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case("json"),
        None => true,
    };
    if is_json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(render_text(report))
    }
}

fn render_text(report: &RedactionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Redaction report ({})", report.generated_at);
    let _ = writeln!(out, "{} match(es)", report.entries.len());
    let _ = writeln!(out);
    for e in &report.entries {
        let _ = writeln!(
            out,
            "{}:{}  {}  {}  {:?}",
            e.file, e.line, e.rule_id, e.secret_type, e.confidence
        );
    }
    out
}

/// Resolves the path a `--redaction-report[=PATH]` flag writes to.
/// `arg` is the flag's raw value: an explicit path, or `""` when the
/// flag was given with no value (clap's `default_missing_value`),
/// meaning "derive one from the output path".
#[must_use]
pub fn resolve_redaction_report_path(arg: &str, output_path: Option<&Path>) -> PathBuf {
    if !arg.is_empty() {
        return PathBuf::from(arg);
    }
    match output_path {
        Some(p) => {
            let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
            let parent = p.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
            parent.join(format!("{stem}.redactions.json"))
        }
        None => PathBuf::from("redactions.json"),
    }
}
