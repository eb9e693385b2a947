//! # harvx-types
//!
//! **Tier 0 (Core Types)**
//!
//! Core data structures shared across the `harvx` context-packaging
//! pipeline: `FileDescriptor`, `Profile`, tier/redaction definitions, and
//! the `RenderData` the renderer consumes. Only data types and their
//! Serde wiring belong here.
//!
//! ## Stability Policy
//!
//! JSON is the primary contract: the `.meta.json` sidecar and redaction
//! report schemas are stable by `SCHEMA_VERSION`, not by Rust struct
//! literal shape. New optional fields get `#[serde(default)]`.
//!
//! ## What belongs here
//! * Pure data structs
//! * Serialization/deserialization logic
//! * Schema version markers
//!
//! ## What does NOT belong here
//! * File I/O
//! * CLI argument parsing
//! * Pipeline stage logic

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Schema version for `.meta.json` sidecars and redaction reports.
pub const SCHEMA_VERSION: u32 = 1;

// -----------------------------------------------------------------------
// FileDescriptor
// -----------------------------------------------------------------------

/// The unit of the pipeline: one discovered file, carried through every
/// stage and mutated only by its designated stage, in pipeline order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileDescriptor {
    /// Canonical relative path from the walk root, slash-normalized.
    /// The stable identifier and sort key.
    pub path: String,
    /// Absolute path, for I/O only. Never rendered.
    pub abs_path: PathBuf,
    /// Size in bytes on disk.
    pub size: u64,
    /// Relevance tier, 0 (highest) to 5 (lowest). Defaults to 2.
    pub tier: u8,
    /// Detected language identifier, may be empty.
    pub language: String,
    /// Textual content after load and redaction; possibly truncated or
    /// replaced by a compressed signature. Empty until the load stage runs.
    pub content: String,
    /// Token count of `content` under the active encoding.
    pub token_count: usize,
    /// Line count of `content`, maintained alongside `token_count` for
    /// density reporting.
    pub line_count: usize,
    /// Redaction matches contributed by this file.
    pub redactions: Vec<RedactionMatch>,
    /// Whether `content` is the compressed projection.
    pub is_compressed: bool,
    /// 64-bit stable hash of the final `content`.
    pub content_hash: u64,
    /// Non-fatal per-file error captured without aborting the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileDescriptor {
    /// Construct a descriptor fresh off the walker, before classification,
    /// loading, redaction, or tokenization have run.
    #[must_use]
    pub fn new(path: String, abs_path: PathBuf, size: u64) -> Self {
        Self {
            path,
            abs_path,
            size,
            tier: DEFAULT_TIER,
            language: String::new(),
            content: String::new(),
            token_count: 0,
            line_count: 0,
            redactions: Vec::new(),
            is_compressed: false,
            content_hash: 0,
            error: None,
        }
    }
}

/// Default tier assigned to files unmatched by any tier definition.
pub const DEFAULT_TIER: u8 = 2;

// -----------------------------------------------------------------------
// Config / Profile
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    #[default]
    Markdown,
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Tokenizer {
    #[default]
    Cl100kBase,
    O200kBase,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum TruncationStrategy {
    #[default]
    Skip,
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    Claude,
    Chatgpt,
    #[default]
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

/// A single tier definition: a tier number plus the glob patterns that
/// assign it. The full default set has six entries covering tiers 0..5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierDefinition {
    pub tier: u8,
    pub patterns: Vec<String>,
}

/// A custom redaction pattern as authored in a profile's
/// `[[redaction.custom_patterns]]` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPattern {
    pub id: String,
    pub description: String,
    pub regex: String,
    pub secret_type: String,
    pub confidence: Confidence,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub entropy_threshold: Option<f32>,
}

/// Redaction settings nested under a profile.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RedactionSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub exclude_paths: Vec<String>,
    #[serde(default)]
    pub confidence_threshold: Confidence,
    #[serde(default)]
    pub custom_patterns: Vec<CustomPattern>,
}

fn default_true() -> bool {
    true
}

impl RedactionSettings {
    #[must_use]
    pub fn enabled_default() -> Self {
        Self {
            enabled: true,
            exclude_paths: Vec::new(),
            confidence_threshold: Confidence::Medium,
            custom_patterns: Vec::new(),
        }
    }
}

/// A named, inheritable configuration bundle.
///
/// Profiles form a DAG via `extends`; resolution is a depth-first deep
/// merge with array replacement (not concatenation) and cycle detection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Profile {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<Format>,
    #[serde(default)]
    pub max_tokens: Option<usize>,
    #[serde(default)]
    pub tokenizer: Option<Tokenizer>,
    #[serde(default)]
    pub compression_enabled: Option<bool>,
    #[serde(default)]
    pub redaction: Option<RedactionSettings>,
    #[serde(default)]
    pub priority_files: Vec<String>,
    #[serde(default)]
    pub tier_definitions: Option<Vec<TierDefinition>>,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub target: Option<Target>,
    /// Keys present in the source document this crate doesn't recognize;
    /// retained so an unrecognized config never becomes fatal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown_keys: Vec<String>,
}

/// Default, profile-free relevance tiers 0..5.
#[must_use]
pub fn default_tier_definitions() -> Vec<TierDefinition> {
    vec![
        TierDefinition {
            tier: 0,
            patterns: vec![
                "package.json".into(),
                "Cargo.toml".into(),
                "pyproject.toml".into(),
                "go.mod".into(),
            ],
        },
        TierDefinition {
            tier: 1,
            patterns: vec![
                "!**/*_test.*".into(),
                "!**/*.test.*".into(),
                "!**/test_*.*".into(),
                "!tests/**/*".into(),
                "src/**/*".into(),
                "lib/**/*".into(),
            ],
        },
        TierDefinition {
            tier: 2,
            patterns: vec![],
        },
        TierDefinition {
            tier: 3,
            patterns: vec![
                "**/*_test.*".into(),
                "**/*.test.*".into(),
                "**/test_*.*".into(),
                "tests/**/*".into(),
            ],
        },
        TierDefinition {
            tier: 4,
            patterns: vec!["**/*.md".into(), "docs/**/*".into()],
        },
        TierDefinition {
            tier: 5,
            patterns: vec![".github/**/*".into(), "**/*.yml".into(), "**/*.yaml".into()],
        },
    ]
}

// -----------------------------------------------------------------------
// Redaction
// -----------------------------------------------------------------------

/// A compiled-at-construction redaction rule. The registry holding these
/// is read-only after construction.
#[derive(Debug, Clone)]
pub struct RedactionRuleMeta {
    pub id: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub secret_type: String,
    pub confidence: Confidence,
    pub entropy_threshold: Option<f32>,
}

/// A single redaction hit. Never carries the original matched text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedactionMatch {
    pub rule_id: String,
    pub secret_type: String,
    pub confidence: Confidence,
    pub file_path: String,
    pub line_number: usize,
    pub start_col: usize,
    pub end_col: usize,
    pub replacement: String,
}

impl RedactionMatch {
    #[must_use]
    pub fn replacement_for(secret_type: &str) -> String {
        format!("[REDACTED:{secret_type}]")
    }
}

// -----------------------------------------------------------------------
// Render data
// -----------------------------------------------------------------------

/// One rendered file entry, produced from a sorted, budget-enforced
/// `FileDescriptor` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFileEntry {
    pub path: String,
    pub size: u64,
    pub tier: u8,
    pub language: String,
    pub token_count: usize,
    pub line_count: usize,
    pub content: String,
    pub is_compressed: bool,
    pub truncated: bool,
}

/// Per-tier token/file counts for the summary section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TierSummary {
    pub tier: u8,
    pub files: usize,
    pub tokens: usize,
}

/// Redaction totals by secret type and confidence, for the summary
/// section and the `.meta.json` sidecar.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RedactionSummary {
    pub total_matches: usize,
    pub by_secret_type: HashMap<String, usize>,
    pub by_confidence: HashMap<String, usize>,
}

/// All inputs the renderer needs. Constructed once, read-only during
/// rendering, never reading the wall clock itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderData {
    pub project_name: String,
    pub generated_at: String,
    /// Reserved fixed-width placeholder, patched post-write when
    /// `--output-metadata` requests an embedded hash.
    pub content_hash_placeholder: String,
    pub profile_name: String,
    pub tokenizer: Tokenizer,
    pub total_tokens: usize,
    pub files: Vec<RenderFileEntry>,
    pub directory_tree: String,
    pub tier_summary: Vec<TierSummary>,
    pub top_files: Vec<(String, usize)>,
    pub redaction_summary: RedactionSummary,
    pub heatmap: Option<Vec<TierSummary>>,
    pub line_numbers: bool,
}

// -----------------------------------------------------------------------
// Pipeline summary / exit-code accounting
// -----------------------------------------------------------------------

/// Aggregate pipeline run statistics, shared by the orchestrator's
/// return value, `--json` preview, and the `.meta.json` sidecar.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PipelineSummary {
    pub total_discovered: usize,
    pub total_included: usize,
    pub total_excluded: usize,
    pub total_truncated: usize,
    pub total_tokens: usize,
    pub budget_remaining: i64,
    pub partial_failures: usize,
    pub redaction: RedactionSummary,
    pub tier_summary: Vec<TierSummary>,
    pub content_hash: Option<String>,
}

/// Per-file metadata row persisted to the `.meta.json` sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaFileEntry {
    pub path: String,
    pub tier: u8,
    pub tokens: usize,
    pub size: u64,
    pub is_compressed: bool,
    pub redactions: usize,
}

/// `.meta.json` sidecar document, deterministic key order via field
/// declaration order (serde_json preserves insertion order only with the
/// `preserve_order` feature; callers must serialize via a `BTreeMap` or
/// explicit field order as this struct does).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaSidecar {
    pub schema_version: u32,
    pub profile: String,
    pub tokenizer: Tokenizer,
    pub format: Format,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub generated_at: String,
    pub files: Vec<MetaFileEntry>,
    pub summary: PipelineSummary,
}

// -----------------------------------------------------------------------
// Redaction report (external artifact)
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionReportEntry {
    pub file: String,
    pub line: usize,
    pub rule_id: String,
    pub secret_type: String,
    pub confidence: Confidence,
    pub replacement: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionReport {
    pub schema_version: u32,
    pub generated_at: String,
    pub entries: Vec<RedactionReportEntry>,
    pub by_secret_type: HashMap<String, usize>,
    pub by_confidence: HashMap<String, usize>,
}

// -----------------------------------------------------------------------
// Workspace manifest (external collaborator, parsed but not consumed)
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceRepo {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entrypoints: Vec<String>,
    #[serde(default)]
    pub integrates_with: Vec<String>,
    #[serde(default)]
    pub shared_schemas: Vec<String>,
    #[serde(default)]
    pub docs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceManifest {
    pub workspace: WorkspaceMeta,
    #[serde(default)]
    pub repos: Vec<WorkspaceRepo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceMeta {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// -----------------------------------------------------------------------
// State snapshot (external collaborator: diff / review-slice)
// -----------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFileEntry {
    pub size: u64,
    pub content_hash: String,
    pub modified_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub version: String,
    pub profile: String,
    pub generated_at: String,
    #[serde(default)]
    pub git_branch: Option<String>,
    #[serde(default)]
    pub git_head_sha: Option<String>,
    pub root_dir: String,
    pub files: std::collections::BTreeMap<String, StateFileEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_version_is_one() {
        assert_eq!(SCHEMA_VERSION, 1);
    }

    #[test]
    fn file_descriptor_defaults_to_tier_two() {
        let fd = FileDescriptor::new("src/main.rs".into(), PathBuf::from("/abs/src/main.rs"), 100);
        assert_eq!(fd.tier, DEFAULT_TIER);
        assert!(fd.content.is_empty());
        assert_eq!(fd.token_count, 0);
    }

    #[test]
    fn default_tier_definitions_cover_zero_through_five() {
        let defs = default_tier_definitions();
        let tiers: Vec<u8> = defs.iter().map(|d| d.tier).collect();
        assert_eq!(tiers, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn redaction_match_replacement_format() {
        assert_eq!(
            RedactionMatch::replacement_for("aws_access_key"),
            "[REDACTED:aws_access_key]"
        );
    }

    #[test]
    fn format_default_is_markdown() {
        assert_eq!(Format::default(), Format::Markdown);
    }

    #[test]
    fn confidence_ordering() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn profile_serde_roundtrip_minimal() {
        let p = Profile::default();
        let json = serde_json::to_string(&p).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extends, None);
    }

    #[test]
    fn meta_sidecar_serde_roundtrip() {
        let sidecar = MetaSidecar {
            schema_version: SCHEMA_VERSION,
            profile: "generic".into(),
            tokenizer: Tokenizer::Cl100kBase,
            format: Format::Markdown,
            content_hash: Some("deadbeef".into()),
            generated_at: "2026-01-01T00:00:00Z".into(),
            files: vec![],
            summary: PipelineSummary::default(),
        };
        let json = serde_json::to_string(&sidecar).unwrap();
        let back: MetaSidecar = serde_json::from_str(&json).unwrap();
        assert_eq!(back.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn state_snapshot_serde_roundtrip() {
        let mut files = std::collections::BTreeMap::new();
        files.insert(
            "src/main.rs".to_string(),
            StateFileEntry {
                size: 10,
                content_hash: "abc123".into(),
                modified_time: "2026-01-01T00:00:00Z".into(),
            },
        );
        let snap = StateSnapshot {
            version: "1".into(),
            profile: "generic".into(),
            generated_at: "2026-01-01T00:00:00Z".into(),
            git_branch: Some("main".into()),
            git_head_sha: Some("deadbeef".into()),
            root_dir: "/repo".into(),
            files,
        };
        let json = serde_json::to_string(&snap).unwrap();
        let back: StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.files.len(), 1);
    }
}
