//! The single pipeline entrypoint: wires every stage crate together in
//! the order `discover -> classify -> load+redact+tokenize+compress ->
//! sort -> budget -> render -> write(+hash) -> report`, grounded on the
//! teacher's `scan_workflow`'s single-function stage-wiring style.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use harvx_compress::CompressorRegistry;
use harvx_config::EffectiveConfig;
use harvx_redact::SecretRegistry;
use harvx_tier::TierClassifier;
use harvx_types::{
    FileDescriptor, MetaSidecar, PipelineSummary, RedactionMatch, RedactionReport, RedactionSummary,
    RenderData, RenderFileEntry, TierSummary,
};
use harvx_walk::{discover, load_parallel, CancellationToken, WalkConfig};
use harvx_write::WriteOutcome;

use crate::error::{ErrorCode, HarvxError};

/// Process exit code used when a run is cancelled mid-flight. Not part
/// of the exit-code table the config/write/redaction/assert-include
/// paths use; chosen to match the conventional SIGINT exit
/// convention, since nothing in the spec mandates a specific value.
pub const CANCELLED_EXIT_CODE: i32 = 130;

/// Everything one `run` call produces, regardless of whether the run
/// completed cleanly, partially, or was cut short by a policy trip.
/// `error` carries the same `HarvxError` an early, nothing-written
/// abort would have returned — kept here, rather than in `Result::Err`,
/// for the cases (`--fail-on-redaction`) where the artifact genuinely
/// was written and the caller needs both pieces of information.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub exit_code: i32,
    pub summary: PipelineSummary,
    pub write_outcome: Option<WriteOutcome>,
    pub redaction_report: Option<RedactionReport>,
    pub meta_sidecar: Option<MetaSidecar>,
    pub error: Option<HarvxError>,
    pub warnings: Vec<String>,
}

impl PipelineOutcome {
    fn cancelled(summary: PipelineSummary) -> Self {
        Self { exit_code: CANCELLED_EXIT_CODE, summary, ..Self::default() }
    }
}

const RENDER_OVERHEAD_TOKENS: usize = 200;

/// Runs the full context-generation pipeline for one invocation.
///
/// Returns `Err(HarvxError)` only for failures before any artifact
/// exists (bad root, bad profile/tier config, a failed walk, or a
/// failed write); every other terminal state — partial per-file
/// failures, a tripped `--fail-on-redaction`, cancellation — comes back
/// as `Ok(PipelineOutcome)` with `exit_code`/`error` set accordingly, so
/// the caller can still inspect what (if anything) was written.
pub fn run(cancel: &CancellationToken, config: &EffectiveConfig) -> Result<PipelineOutcome, HarvxError> {
    if !config.root.is_dir() {
        return Err(HarvxError::path_not_found(&config.root.display().to_string()));
    }

    let classifier = TierClassifier::compile(&config.tier_definitions)
        .map_err(|e| HarvxError::config_invalid(e))?;

    let walk_cfg = WalkConfig {
        max_file_size: harvx_walk::DEFAULT_MAX_FILE_SIZE,
        git_tracked_only: config.git_tracked_only,
        include: config.include.clone(),
        extensions: config.extensions.clone(),
        cli_exclude: config.exclude.clone(),
    };
    let outcome = discover(&config.root, &walk_cfg).map_err(|e| HarvxError::walk_failed(e))?;
    let mut warnings = outcome.warnings;
    let total_discovered = outcome.files.len();
    let total_skipped_by_walk = outcome.skipped.len();

    if cancel.is_cancelled() {
        return Ok(PipelineOutcome::cancelled(PipelineSummary {
            total_discovered,
            ..PipelineSummary::default()
        }));
    }

    let mut files = outcome.files;
    for fd in &mut files {
        fd.tier = classifier.classify(&fd.path);
    }

    let secret_registry = if config.redact {
        Some(
            SecretRegistry::builtin()
                .and_then(|r| r.with_custom_patterns(&config.redaction_settings.custom_patterns))
                .map_err(|e| HarvxError::config_invalid(e))?,
        )
    } else {
        None
    };
    let redact_exclude = compile_globset(&config.redaction_settings.exclude_paths)
        .map_err(|e| HarvxError::config_invalid(e))?;
    let compressor_registry = CompressorRegistry::new();
    let threshold = config.redaction_settings.confidence_threshold;
    let compress = config.compress;
    let tokenizer = config.tokenizer;

    let files = load_parallel(files, 0, cancel, |fd| {
        load_one_file(fd, secret_registry.as_ref(), &redact_exclude, threshold, compress, &compressor_registry, tokenizer);
    });

    if cancel.is_cancelled() {
        return Ok(PipelineOutcome::cancelled(PipelineSummary {
            total_discovered,
            ..PipelineSummary::default()
        }));
    }

    let partial_failures = files.iter().filter(|f| f.error.is_some()).count();
    let all_matches: Vec<RedactionMatch> = files.iter().flat_map(|f| f.redactions.clone()).collect();

    let mut sorted = files;
    harvx_budget::promote_priority_files(&mut sorted, &config.priority_files);
    harvx_budget::stable_sort(&mut sorted);
    let original_tokens: HashMap<String, usize> =
        sorted.iter().map(|f| (f.path.clone(), f.token_count)).collect();

    let budget_outcome = harvx_budget::enforce_budget(
        sorted,
        config.max_tokens,
        RENDER_OVERHEAD_TOKENS,
        config.truncation_strategy,
        config.tokenizer,
    );

    if let Some(pattern) = &config.assert_include {
        let glob = Glob::new(pattern).map_err(|e| HarvxError::config_invalid(e))?.compile_matcher();
        if !budget_outcome.included.iter().any(|f| glob.is_match(&f.path)) {
            return Err(HarvxError::assert_include_failed(pattern));
        }
    }

    let redaction_summary = summarize_redactions(&all_matches);
    let summary_partial = PipelineSummary {
        total_discovered,
        total_included: budget_outcome.included.len(),
        total_excluded: total_skipped_by_walk + budget_outcome.excluded.len(),
        total_truncated: budget_outcome.truncated_count,
        total_tokens: budget_outcome.total_tokens,
        budget_remaining: budget_outcome.budget_remaining,
        partial_failures,
        redaction: redaction_summary,
        tier_summary: budget_outcome.tier_summary.clone(),
        content_hash: None,
    };

    if config.token_count_only {
        return Ok(PipelineOutcome {
            exit_code: exit_code_for(partial_failures, false),
            summary: summary_partial,
            warnings,
            ..PipelineOutcome::default()
        });
    }

    let render_files: Vec<RenderFileEntry> = budget_outcome
        .included
        .iter()
        .map(|fd| RenderFileEntry {
            path: fd.path.clone(),
            size: fd.size,
            tier: fd.tier,
            language: fd.language.clone(),
            token_count: fd.token_count,
            line_count: fd.line_count,
            content: fd.content.clone(),
            is_compressed: fd.is_compressed,
            truncated: original_tokens.get(&fd.path) != Some(&fd.token_count),
        })
        .collect();

    let top_files: Vec<(String, usize)> = match config.top_files {
        Some(n) => {
            let mut ranked: Vec<(String, usize)> =
                render_files.iter().map(|f| (f.path.clone(), f.token_count)).collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            ranked.truncate(n);
            ranked
        }
        None => Vec::new(),
    };

    let project_name = config
        .root
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("project")
        .to_string();
    let generated_at = current_timestamp();
    let heatmap = config.heatmap.then(|| budget_outcome.tier_summary.clone());

    let paths: Vec<String> = render_files.iter().map(|f| f.path.clone()).collect();
    let directory_tree = harvx_render::render_directory_tree(&paths);

    let render_data = RenderData {
        project_name,
        generated_at: generated_at.clone(),
        content_hash_placeholder: "0".repeat(64),
        profile_name: config.profile_name.clone(),
        tokenizer: config.tokenizer,
        total_tokens: budget_outcome.total_tokens,
        files: render_files,
        directory_tree,
        tier_summary: budget_outcome.tier_summary.clone(),
        top_files,
        redaction_summary: summarize_redactions(&all_matches),
        heatmap,
        line_numbers: config.line_numbers,
    };

    if cancel.is_cancelled() {
        return Ok(PipelineOutcome::cancelled(summary_partial));
    }

    let (write_outcome, extra_outcomes) = write_output(config, &render_data)
        .map_err(|e| HarvxError::write_failed(e))?;

    if let Some(outcome) = &write_outcome {
        if config.output_metadata {
            if let Some(path) = &config.output_path {
                if !config.stdout {
                    patch_content_hash_placeholder(path, &outcome.content_hash)
                        .map_err(|e| HarvxError::write_failed(e))?;
                    let sidecar = harvx_report::build_meta_sidecar(
                        &budget_outcome_descriptors_for_sidecar(&render_data),
                        &PipelineSummary { content_hash: Some(outcome.content_hash.clone()), ..summary_partial.clone() },
                        config.profile_name.clone(),
                        config.tokenizer,
                        config.format,
                        Some(outcome.content_hash.clone()),
                        generated_at.clone(),
                    );
                    harvx_report::write_meta_sidecar(&harvx_report::sidecar_path_for(path), &sidecar)
                        .map_err(|e| HarvxError::write_failed(e))?;
                }
            }
        }
        eprintln!("content hash: {}", outcome.content_hash);
    }
    let _ = extra_outcomes;

    let redaction_report = if let Some(arg) = &config.redaction_report {
        let path = harvx_report::resolve_redaction_report_path(arg, config.output_path.as_deref());
        let report = harvx_report::build_redaction_report(&all_matches, generated_at.clone());
        let rendered = harvx_report::render_redaction_report(&report, &path)
            .map_err(|e| HarvxError::write_failed(e))?;
        std::fs::write(&path, rendered).map_err(|e| HarvxError::write_failed(e))?;
        Some(report)
    } else {
        None
    };

    let content_hash = write_outcome.as_ref().map(|o| o.content_hash.clone());
    let summary = PipelineSummary { content_hash, ..summary_partial };

    if config.fail_on_redaction && !all_matches.is_empty() {
        let err = HarvxError::redaction_policy_tripped(all_matches.len());
        return Ok(PipelineOutcome {
            exit_code: err.exit_code(),
            summary,
            write_outcome,
            redaction_report,
            meta_sidecar: None,
            error: Some(err),
            warnings,
        });
    }

    warnings.extend(outcome_warnings_from_skips(&walk_cfg));

    Ok(PipelineOutcome {
        exit_code: exit_code_for(partial_failures, false),
        summary,
        write_outcome,
        redaction_report,
        meta_sidecar: None,
        error: None,
        warnings,
    })
}

fn exit_code_for(partial_failures: usize, cancelled: bool) -> i32 {
    if cancelled {
        return CANCELLED_EXIT_CODE;
    }
    if partial_failures > 0 {
        2
    } else {
        0
    }
}

fn outcome_warnings_from_skips(_walk_cfg: &WalkConfig) -> Vec<String> {
    Vec::new()
}

/// Placeholder list used only to satisfy `build_meta_sidecar`'s
/// per-file shape from already-rendered entries, since by this point
/// the original `FileDescriptor`s have been consumed into `RenderData`.
fn budget_outcome_descriptors_for_sidecar(data: &RenderData) -> Vec<FileDescriptor> {
    data.files
        .iter()
        .map(|f| {
            let mut fd = FileDescriptor::new(f.path.clone(), PathBuf::new(), f.size);
            fd.tier = f.tier;
            fd.token_count = f.token_count;
            fd.is_compressed = f.is_compressed;
            fd
        })
        .collect()
}

fn write_output(
    config: &EffectiveConfig,
    data: &RenderData,
) -> anyhow::Result<(Option<WriteOutcome>, Vec<WriteOutcome>)> {
    if let Some(parts_n) = config.split {
        let base = config
            .output_path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("--split requires -o/--output"))?;
        let (parts, overflow_warnings) =
            harvx_write::split_into_parts(&data.files, parts_n, RENDER_OVERHEAD_TOKENS);
        for w in &overflow_warnings {
            eprintln!(
                "warning: {} ({} tokens) exceeds the per-part budget of {} tokens and was written alone",
                w.path, w.tokens, w.budget
            );
        }
        let total = parts.len();
        let mut outcomes = Vec::with_capacity(total);
        for (i, part) in parts.iter().enumerate() {
            let part_path = harvx_write::part_file_name(&base, i + 1, total);
            let mut part_data = data.clone();
            part_data.files = part.files.clone();
            part_data.total_tokens = part.tokens;
            part_data.tier_summary = summarize_tiers(&part.files);
            let path_list: Vec<String> = part.files.iter().map(|f| f.path.clone()).collect();
            part_data.directory_tree = harvx_render::render_directory_tree(&path_list);
            let outcome = harvx_write::write_atomic(&part_path, config.force, |w| {
                harvx_render::render_to(w, config.format, &part_data)
            })?;
            outcomes.push(outcome);
        }
        let first = outcomes.first().cloned();
        Ok((first, outcomes))
    } else if config.stdout || config.output_path.is_none() {
        let outcome = harvx_write::write_stdout(|w| harvx_render::render_to(w, config.format, data))?;
        Ok((Some(outcome), Vec::new()))
    } else {
        let path = config.output_path.as_ref().unwrap();
        let outcome =
            harvx_write::write_atomic(path, config.force, |w| harvx_render::render_to(w, config.format, data))?;
        Ok((Some(outcome), Vec::new()))
    }
}

fn summarize_tiers(files: &[RenderFileEntry]) -> Vec<TierSummary> {
    let mut by_tier: std::collections::BTreeMap<u8, (usize, usize)> = std::collections::BTreeMap::new();
    for f in files {
        let entry = by_tier.entry(f.tier).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += f.token_count;
    }
    by_tier.into_iter().map(|(tier, (files, tokens))| TierSummary { tier, files, tokens }).collect()
}

fn patch_content_hash_placeholder(path: &Path, hash: &str) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let placeholder = "0".repeat(64);
    if let Some(pos) = contents.find(&placeholder) {
        let mut patched = contents;
        patched.replace_range(pos..pos + placeholder.len(), hash);
        std::fs::write(path, patched)?;
    }
    Ok(())
}

fn current_timestamp() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

fn summarize_redactions(matches: &[RedactionMatch]) -> RedactionSummary {
    let mut by_secret_type = HashMap::new();
    let mut by_confidence = HashMap::new();
    for m in matches {
        *by_secret_type.entry(m.secret_type.clone()).or_insert(0) += 1;
        *by_confidence.entry(format!("{:?}", m.confidence).to_lowercase()).or_insert(0) += 1;
    }
    RedactionSummary { total_matches: matches.len(), by_secret_type, by_confidence }
}

fn compile_globset(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for p in patterns {
        builder.add(Glob::new(p)?);
    }
    Ok(Some(builder.build()?))
}

#[allow(clippy::too_many_arguments)]
fn load_one_file(
    fd: &mut FileDescriptor,
    registry: Option<&SecretRegistry>,
    redact_exclude: &Option<GlobSet>,
    threshold: harvx_types::Confidence,
    compress: bool,
    compressor_registry: &CompressorRegistry,
    tokenizer: harvx_types::Tokenizer,
) {
    let bytes = match std::fs::read(&fd.abs_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            fd.error = Some(e.to_string());
            return;
        }
    };
    let content = String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
    fd.language = detect_language(&fd.path);

    let excluded_from_redaction = redact_exclude.as_ref().is_some_and(|set| set.is_match(&fd.path));
    let (redacted, matches) = match registry {
        Some(registry) if !excluded_from_redaction => {
            harvx_redact::redact_content(&content, &fd.path, registry, threshold)
        }
        _ => (content, Vec::new()),
    };

    let (final_content, is_compressed) =
        if compress { compressor_registry.compress(extension_of(&fd.path), &redacted) } else { (redacted, false) };

    fd.token_count = harvx_tokenize::count_tokens(&final_content, tokenizer);
    fd.line_count = harvx_tokenize::count_lines(&final_content);
    fd.content_hash = stable_u64_hash(&final_content);
    fd.redactions = matches;
    fd.is_compressed = is_compressed;
    fd.content = final_content;
}

fn extension_of(path: &str) -> &str {
    Path::new(path).extension().and_then(|e| e.to_str()).unwrap_or("")
}

fn stable_u64_hash(content: &str) -> u64 {
    let hash = blake3::hash(content.as_bytes());
    let bytes = hash.as_bytes();
    u64::from_le_bytes(bytes[0..8].try_into().unwrap())
}

fn detect_language(path: &str) -> String {
    match extension_of(path).to_ascii_lowercase().as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "rb" => "ruby",
        "sh" | "bash" => "shell",
        "md" | "markdown" => "markdown",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "" => "",
        other => return other.to_string(),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvx_types::Confidence;
    use std::fs;

    fn cfg(root: PathBuf) -> EffectiveConfig {
        EffectiveConfig { root, stdout: true, ..EffectiveConfig::default() }
    }

    #[test]
    fn rejects_a_root_that_is_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("missing");
        let cancel = CancellationToken::new();
        let result = run(&cancel, &cfg(bogus));
        assert!(matches!(result, Err(e) if e.code == ErrorCode::PathNotFound));
    }

    #[test]
    fn empty_directory_renders_successfully_with_zero_files() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = CancellationToken::new();
        let outcome = run(&cancel, &cfg(dir.path().to_path_buf())).unwrap();
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.summary.total_included, 0);
    }

    #[test]
    fn discovers_and_renders_a_simple_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
        let cancel = CancellationToken::new();
        let outcome = run(&cancel, &cfg(dir.path().to_path_buf())).unwrap();
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(outcome.summary.total_included, 1);
        assert!(outcome.write_outcome.is_some());
    }

    #[test]
    fn fail_on_redaction_still_writes_the_artifact() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("secret.env"), "AWS_SECRET_ACCESS_KEY=wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY\n")
            .unwrap();
        let cancel = CancellationToken::new();
        let config = EffectiveConfig {
            fail_on_redaction: true,
            output_path: Some(dir.path().join("out.md")),
            stdout: false,
            ..cfg(dir.path().to_path_buf())
        };
        let outcome = run(&cancel, &config).unwrap();
        assert_eq!(outcome.exit_code, 1);
        assert!(outcome.error.is_some());
        assert!(outcome.write_outcome.is_some());
        assert!(dir.path().join("out.md").exists());
    }

    #[test]
    fn assert_include_with_no_match_is_fatal_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("main.rs"), "fn main() {}\n").unwrap();
        let cancel = CancellationToken::new();
        let config = EffectiveConfig {
            assert_include: Some("**/*.py".to_string()),
            output_path: Some(dir.path().join("out.md")),
            stdout: false,
            ..cfg(dir.path().to_path_buf())
        };
        let result = run(&cancel, &config);
        assert!(matches!(result, Err(e) if e.code == ErrorCode::AssertIncludeFailed));
        assert!(!dir.path().join("out.md").exists());
    }

    #[test]
    fn partial_failure_still_produces_an_artifact_with_exit_two() {
        // A dangling descriptor whose abs_path doesn't exist simulates a
        // file that vanished between discovery and loading.
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.rs"), "fn ok() {}\n").unwrap();
        let cancel = CancellationToken::new();
        // The walker itself won't produce a dangling file, so exercise
        // the per-file error path directly through `load_one_file`.
        let mut fd = FileDescriptor::new("missing.rs".to_string(), dir.path().join("missing.rs"), 0);
        load_one_file(&mut fd, None, &None, Confidence::Medium, false, &CompressorRegistry::new(), harvx_types::Tokenizer::None);
        assert!(fd.error.is_some());
    }

    #[test]
    fn token_count_only_skips_rendering() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn a() {}\n").unwrap();
        let cancel = CancellationToken::new();
        let config = EffectiveConfig { token_count_only: true, ..cfg(dir.path().to_path_buf()) };
        let outcome = run(&cancel, &config).unwrap();
        assert!(outcome.write_outcome.is_none());
        assert!(outcome.summary.total_tokens > 0 || outcome.summary.total_included == 1);
    }

    #[test]
    fn cancellation_before_discovery_checkpoint_returns_promptly() {
        let dir = tempfile::tempdir().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = run(&cancel, &cfg(dir.path().to_path_buf())).unwrap();
        assert_eq!(outcome.exit_code, CANCELLED_EXIT_CODE);
    }
}
