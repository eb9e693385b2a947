use std::path::PathBuf;

use harvx_types::{
    default_tier_definitions, Format, RedactionSettings, Target, TierDefinition, Tokenizer,
    TruncationStrategy,
};

/// The fully resolved configuration for a single pipeline run: every
/// field has a concrete value, with the four-source precedence
/// (defaults < profile file < env < CLI flags) already applied. Built
/// once per invocation and passed by reference to every stage.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub root: PathBuf,
    pub profile_name: String,
    pub output_path: Option<PathBuf>,
    pub stdout: bool,
    pub format: Format,
    pub target: Target,
    /// `None` means unlimited (budget enforcement disabled).
    pub max_tokens: Option<usize>,
    pub tokenizer: Tokenizer,
    pub truncation_strategy: TruncationStrategy,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub extensions: Vec<String>,
    pub git_tracked_only: bool,
    pub compress: bool,
    pub redact: bool,
    pub fail_on_redaction: bool,
    pub redaction_report: Option<String>,
    pub output_metadata: bool,
    pub assert_include: Option<String>,
    pub token_count_only: bool,
    pub top_files: Option<usize>,
    pub heatmap: bool,
    pub split: Option<usize>,
    pub line_numbers: bool,
    pub json: bool,
    pub force: bool,
    pub verbose: u8,
    pub quiet: bool,
    pub priority_files: Vec<String>,
    pub tier_definitions: Vec<TierDefinition>,
    pub redaction_settings: RedactionSettings,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            profile_name: "default".to_string(),
            output_path: None,
            stdout: false,
            format: Format::Markdown,
            target: Target::Generic,
            max_tokens: None,
            tokenizer: Tokenizer::Cl100kBase,
            truncation_strategy: TruncationStrategy::Skip,
            include: Vec::new(),
            exclude: Vec::new(),
            extensions: Vec::new(),
            git_tracked_only: false,
            compress: false,
            redact: true,
            fail_on_redaction: false,
            redaction_report: None,
            output_metadata: false,
            assert_include: None,
            token_count_only: false,
            top_files: None,
            heatmap: false,
            split: None,
            line_numbers: false,
            json: false,
            force: false,
            verbose: 0,
            quiet: false,
            priority_files: Vec::new(),
            tier_definitions: default_tier_definitions(),
            redaction_settings: RedactionSettings::enabled_default(),
        }
    }
}

impl EffectiveConfig {
    /// Applies a `Target` preset's defaults for fields the caller has not
    /// already pinned down: `claude` implies XML at 200k tokens,
    /// `chatgpt` implies Markdown at 128k, `generic` leaves format/budget
    /// untouched (callers apply this before flag/env overrides that name
    /// `--format`/`--max-tokens` explicitly, since an explicit flag always
    /// wins over a target preset).
    pub fn apply_target_preset(&mut self, target: Target, format_pinned: bool, max_tokens_pinned: bool) {
        self.target = target;
        match target {
            Target::Claude => {
                if !format_pinned {
                    self.format = Format::Xml;
                }
                if !max_tokens_pinned {
                    self.max_tokens = Some(200_000);
                }
            }
            Target::Chatgpt => {
                if !format_pinned {
                    self.format = Format::Markdown;
                }
                if !max_tokens_pinned {
                    self.max_tokens = Some(128_000);
                }
            }
            Target::Generic => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claude_preset_sets_xml_and_200k() {
        let mut cfg = EffectiveConfig::default();
        cfg.apply_target_preset(Target::Claude, false, false);
        assert_eq!(cfg.format, Format::Xml);
        assert_eq!(cfg.max_tokens, Some(200_000));
    }

    #[test]
    fn chatgpt_preset_sets_markdown_and_128k() {
        let mut cfg = EffectiveConfig::default();
        cfg.apply_target_preset(Target::Chatgpt, false, false);
        assert_eq!(cfg.format, Format::Markdown);
        assert_eq!(cfg.max_tokens, Some(128_000));
    }

    #[test]
    fn explicit_flag_wins_over_preset() {
        let mut cfg = EffectiveConfig {
            format: Format::Markdown,
            max_tokens: Some(5000),
            ..EffectiveConfig::default()
        };
        cfg.apply_target_preset(Target::Claude, true, true);
        assert_eq!(cfg.format, Format::Markdown);
        assert_eq!(cfg.max_tokens, Some(5000));
    }

    #[test]
    fn generic_preset_touches_nothing() {
        let mut cfg = EffectiveConfig::default();
        cfg.apply_target_preset(Target::Generic, false, false);
        assert_eq!(cfg.format, Format::Markdown);
        assert_eq!(cfg.max_tokens, None);
    }
}
