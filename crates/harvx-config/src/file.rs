use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use harvx_types::{Confidence, CustomPattern, Profile, RedactionSettings, TierDefinition};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "harvx.toml";

/// Walks from `start` upward toward the filesystem root looking for a
/// `harvx.toml`, stopping at (and including) the first directory holding
/// a `.git` entry, which is treated as the repo root boundary.
#[must_use]
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(d) = dir {
        let candidate = d.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if d.join(".git").exists() {
            return None;
        }
        dir = d.parent();
    }
    None
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    profile: HashMap<String, RawProfile>,
}

#[derive(Debug, Deserialize, Default)]
struct RawProfile {
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    output_path: Option<PathBuf>,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    max_tokens: Option<usize>,
    #[serde(default)]
    tokenizer: Option<String>,
    #[serde(default)]
    compression_enabled: Option<bool>,
    #[serde(default)]
    redaction: Option<RawRedaction>,
    #[serde(default)]
    priority_files: Vec<String>,
    #[serde(default)]
    relevance: Option<RawRelevance>,
    #[serde(default)]
    ignore: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawRelevance {
    #[serde(default)]
    tier_0: Vec<String>,
    #[serde(default)]
    tier_1: Vec<String>,
    #[serde(default)]
    tier_2: Vec<String>,
    #[serde(default)]
    tier_3: Vec<String>,
    #[serde(default)]
    tier_4: Vec<String>,
    #[serde(default)]
    tier_5: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawRedaction {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    exclude_paths: Vec<String>,
    #[serde(default)]
    confidence_threshold: Option<String>,
    #[serde(default)]
    custom_patterns: Vec<RawCustomPattern>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawCustomPattern {
    id: String,
    description: String,
    regex: String,
    secret_type: String,
    confidence: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Parses `path` into a map of profile name to `harvx_types::Profile`.
/// Custom redaction pattern regexes are compiled here so an invalid
/// pattern fails fast and names the offending pattern id, matching
/// spec.md §4.1's "compilation failure is a fatal config error".
pub fn load_config_file(path: &Path) -> Result<HashMap<String, Profile>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config_str(&raw)
}

pub fn parse_config_str(raw: &str) -> Result<HashMap<String, Profile>> {
    let file: ConfigFile = toml::from_str(raw).context("parsing harvx.toml")?;
    file.profile
        .into_iter()
        .map(|(name, raw_profile)| {
            let profile = convert_profile(raw_profile)?;
            Ok((name, profile))
        })
        .collect()
}

fn convert_profile(raw: RawProfile) -> Result<Profile> {
    let redaction = match raw.redaction {
        Some(r) => Some(convert_redaction(r)?),
        None => None,
    };
    let tier_definitions = raw.relevance.map(|rel| {
        vec![
            TierDefinition { tier: 0, patterns: rel.tier_0 },
            TierDefinition { tier: 1, patterns: rel.tier_1 },
            TierDefinition { tier: 2, patterns: rel.tier_2 },
            TierDefinition { tier: 3, patterns: rel.tier_3 },
            TierDefinition { tier: 4, patterns: rel.tier_4 },
            TierDefinition { tier: 5, patterns: rel.tier_5 },
        ]
    });
    Ok(Profile {
        extends: raw.extends,
        output_path: raw.output_path,
        format: raw.format.as_deref().map(parse_format).transpose()?,
        max_tokens: raw.max_tokens,
        tokenizer: raw.tokenizer.as_deref().map(parse_tokenizer).transpose()?,
        compression_enabled: raw.compression_enabled,
        redaction,
        priority_files: raw.priority_files,
        tier_definitions,
        ignore: raw.ignore,
        include: raw.include,
        target: raw.target.as_deref().map(parse_target).transpose()?,
        unknown_keys: Vec::new(),
    })
}

fn convert_redaction(raw: RawRedaction) -> Result<RedactionSettings> {
    let confidence = match raw.confidence_threshold {
        Some(s) => parse_confidence(&s)?,
        None => Confidence::Medium,
    };
    let custom_patterns = raw
        .custom_patterns
        .into_iter()
        .map(|p| {
            regex::Regex::new(&p.regex)
                .with_context(|| format!("invalid custom redaction pattern `{}`", p.id))?;
            Ok(CustomPattern {
                id: p.id,
                description: p.description,
                regex: p.regex,
                secret_type: p.secret_type,
                confidence: parse_confidence(&p.confidence)?,
                keywords: p.keywords,
                entropy_threshold: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(RedactionSettings {
        enabled: raw.enabled,
        exclude_paths: raw.exclude_paths,
        confidence_threshold: confidence,
        custom_patterns,
    })
}

fn parse_format(s: &str) -> Result<harvx_types::Format> {
    match s {
        "markdown" | "md" => Ok(harvx_types::Format::Markdown),
        "xml" => Ok(harvx_types::Format::Xml),
        other => anyhow::bail!("unknown format `{other}`"),
    }
}

fn parse_tokenizer(s: &str) -> Result<harvx_types::Tokenizer> {
    match s {
        "cl100k_base" | "cl100k-base" => Ok(harvx_types::Tokenizer::Cl100kBase),
        "o200k_base" | "o200k-base" => Ok(harvx_types::Tokenizer::O200kBase),
        "none" => Ok(harvx_types::Tokenizer::None),
        other => anyhow::bail!("unknown tokenizer `{other}`"),
    }
}

fn parse_target(s: &str) -> Result<harvx_types::Target> {
    match s {
        "claude" => Ok(harvx_types::Target::Claude),
        "chatgpt" => Ok(harvx_types::Target::Chatgpt),
        "generic" => Ok(harvx_types::Target::Generic),
        other => anyhow::bail!("unknown target `{other}`"),
    }
}

fn parse_confidence(s: &str) -> Result<Confidence> {
    match s {
        "low" => Ok(Confidence::Low),
        "medium" => Ok(Confidence::Medium),
        "high" => Ok(Confidence::High),
        other => anyhow::bail!("unknown confidence threshold `{other}`"),
    }
}
