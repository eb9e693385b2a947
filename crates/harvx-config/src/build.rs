use std::path::Path;

use anyhow::{Context, Result};
use harvx_types::{Profile, RedactionSettings};

use crate::cli::{GenerateArgs, GlobalArgs};
use crate::effective::EffectiveConfig;
use crate::file::{find_config_file, load_config_file};
use crate::resolve::resolve_profile;

/// Default profile name used when `--profile`/`HARVX_PROFILE` is absent
/// and no config file defines one either.
pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Builds the fully resolved `EffectiveConfig` for one pipeline run from
/// the four-source precedence chain: built-in defaults, the resolved
/// profile file (if any), environment variables, and CLI flags. Env vs.
/// flag precedence is delegated to `clap`'s own `env = "HARVX_*"`
/// handling on each `GenerateArgs` field, so by the time this function
/// runs, each `Option` field already reflects "flag, else env, else
/// unset" — only the "else profile, else default" tail remains to
/// apply here.
///
/// Returns the config plus any non-fatal warnings (unknown profile keys,
/// suppressed sensitive-ignore overrides are reported elsewhere).
pub fn build_effective_config(
    global: &GlobalArgs,
    generate: &GenerateArgs,
    cwd: &Path,
) -> Result<(EffectiveConfig, Vec<String>)> {
    let mut warnings = Vec::new();
    let profile_name = global.profile.clone().unwrap_or_else(|| DEFAULT_PROFILE_NAME.to_string());

    let profile = match find_config_file(cwd) {
        Some(path) => {
            let profiles = load_config_file(&path)?;
            if profiles.contains_key(&profile_name) {
                resolve_profile(&profile_name, &profiles)
                    .with_context(|| format!("resolving profile `{profile_name}`"))?
            } else if profile_name == DEFAULT_PROFILE_NAME {
                Profile::default()
            } else {
                anyhow::bail!("unknown profile `{profile_name}` (config file: {})", path.display());
            }
        }
        None => Profile::default(),
    };

    for key in &profile.unknown_keys {
        warnings.push(format!("unknown configuration key `{key}` (ignored)"));
    }

    let mut cfg = EffectiveConfig::default();
    cfg.profile_name = profile_name;
    cfg.root = generate.root.clone().unwrap_or_else(|| cwd.to_path_buf());

    apply_profile(&mut cfg, &profile);

    let format_pinned = generate.format.is_some();
    let max_tokens_pinned = generate.max_tokens.is_some();
    warnings.extend(apply_flags(&mut cfg, generate)?);

    if let Some(target) = generate.target.or(profile.target) {
        cfg.apply_target_preset(target, format_pinned, max_tokens_pinned);
    }

    Ok((cfg, warnings))
}

fn apply_profile(cfg: &mut EffectiveConfig, profile: &Profile) {
    if let Some(p) = &profile.output_path {
        cfg.output_path = Some(p.clone());
    }
    if let Some(f) = profile.format {
        cfg.format = f;
    }
    if let Some(mt) = profile.max_tokens {
        cfg.max_tokens = Some(mt);
    }
    if let Some(t) = profile.tokenizer {
        cfg.tokenizer = t;
    }
    if let Some(c) = profile.compression_enabled {
        cfg.compress = c;
    }
    if let Some(redaction) = &profile.redaction {
        apply_redaction_settings(cfg, redaction);
    }
    if !profile.priority_files.is_empty() {
        cfg.priority_files = profile.priority_files.clone();
    }
    if let Some(tiers) = &profile.tier_definitions {
        cfg.tier_definitions = tiers.clone();
    }
    if !profile.ignore.is_empty() {
        cfg.exclude = profile.ignore.clone();
    }
    if !profile.include.is_empty() {
        cfg.include = profile.include.clone();
    }
}

fn apply_redaction_settings(cfg: &mut EffectiveConfig, redaction: &RedactionSettings) {
    cfg.redact = redaction.enabled;
    cfg.redaction_settings = redaction.clone();
}

fn apply_flags(cfg: &mut EffectiveConfig, generate: &GenerateArgs) -> Result<Vec<String>> {
    let mut warnings = Vec::new();
    if let Some(output) = &generate.output {
        cfg.output_path = Some(output.clone());
    }
    cfg.stdout = cfg.stdout || generate.stdout;
    if let Some(format) = generate.format {
        cfg.format = format;
    }
    if let Some(max_tokens_str) = &generate.max_tokens {
        let parsed = harvx_budget::parse_budget(max_tokens_str)?;
        cfg.max_tokens = if parsed == 0 || parsed == usize::MAX { None } else { Some(parsed) };
    }
    if let Some(tokenizer) = generate.tokenizer {
        cfg.tokenizer = tokenizer;
    }
    if let Some(strategy) = generate.truncation_strategy {
        cfg.truncation_strategy = strategy;
    }
    if !generate.include.is_empty() {
        cfg.include = generate.include.clone();
    }
    if !generate.exclude.is_empty() {
        cfg.exclude = generate.exclude.clone();
    }
    if !generate.extension.is_empty() {
        cfg.extensions = generate.extension.clone();
    }
    cfg.git_tracked_only = cfg.git_tracked_only || generate.git_tracked_only;
    cfg.compress = cfg.compress || generate.compress;
    if generate.no_redact {
        cfg.redact = false;
    }
    cfg.fail_on_redaction = cfg.fail_on_redaction || generate.fail_on_redaction;
    if generate.no_redact && cfg.fail_on_redaction {
        // `--no-redact` wins per spec.md §7, but the override is
        // surfaced so it isn't silently inconsistent with the flags
        // the caller actually passed.
        warnings.push(
            "--no-redact and --fail-on-redaction were both set; --no-redact wins, redaction policy will not fail the run".to_string(),
        );
        cfg.fail_on_redaction = false;
    }
    if let Some(report) = &generate.redaction_report {
        cfg.redaction_report = Some(report.clone());
    }
    cfg.output_metadata = cfg.output_metadata || generate.output_metadata;
    if let Some(pattern) = &generate.assert_include {
        cfg.assert_include = Some(pattern.clone());
    }
    cfg.token_count_only = cfg.token_count_only || generate.token_count;
    if let Some(n) = generate.top_files {
        cfg.top_files = Some(n);
    }
    cfg.heatmap = cfg.heatmap || generate.heatmap;
    if let Some(n) = generate.split {
        cfg.split = Some(n);
    }
    cfg.line_numbers = cfg.line_numbers || generate.line_numbers;
    cfg.json = cfg.json || generate.json;
    cfg.force = cfg.force || generate.force;
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_with_no_config_file_and_no_flags() {
        let tmp = tempfile::tempdir().unwrap();
        let global = GlobalArgs::default();
        let generate = GenerateArgs::default();
        let (cfg, warnings) = build_effective_config(&global, &generate, tmp.path()).unwrap();
        assert_eq!(cfg.profile_name, "default");
        assert!(warnings.is_empty());
        assert_eq!(cfg.max_tokens, None);
    }

    #[test]
    fn flag_max_tokens_overrides_profile() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("harvx.toml"),
            "[profile.default]\nmax_tokens = 1000\n",
        )
        .unwrap();
        let global = GlobalArgs::default();
        let generate = GenerateArgs {
            max_tokens: Some("2k".to_string()),
            ..GenerateArgs::default()
        };
        let (cfg, _) = build_effective_config(&global, &generate, tmp.path()).unwrap();
        assert_eq!(cfg.max_tokens, Some(2000));
    }

    #[test]
    fn flag_max_tokens_of_zero_disables_enforcement() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("harvx.toml"),
            "[profile.default]\nmax_tokens = 1000\n",
        )
        .unwrap();
        let global = GlobalArgs::default();
        let generate = GenerateArgs {
            max_tokens: Some("0".to_string()),
            ..GenerateArgs::default()
        };
        let (cfg, _) = build_effective_config(&global, &generate, tmp.path()).unwrap();
        assert_eq!(cfg.max_tokens, None);
    }

    #[test]
    fn profile_applies_when_no_flag_given() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("harvx.toml"),
            "[profile.default]\nmax_tokens = 1000\n",
        )
        .unwrap();
        let global = GlobalArgs::default();
        let generate = GenerateArgs::default();
        let (cfg, _) = build_effective_config(&global, &generate, tmp.path()).unwrap();
        assert_eq!(cfg.max_tokens, Some(1000));
    }

    #[test]
    fn no_redact_wins_over_fail_on_redaction() {
        let tmp = tempfile::tempdir().unwrap();
        let global = GlobalArgs::default();
        let generate = GenerateArgs {
            no_redact: true,
            fail_on_redaction: true,
            ..GenerateArgs::default()
        };
        let (cfg, warnings) = build_effective_config(&global, &generate, tmp.path()).unwrap();
        assert!(!cfg.redact);
        assert!(!cfg.fail_on_redaction);
        assert!(warnings.iter().any(|w| w.contains("--no-redact") && w.contains("--fail-on-redaction")));
    }

    #[test]
    fn unknown_profile_name_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("harvx.toml"), "[profile.ci]\n").unwrap();
        let global = GlobalArgs {
            profile: Some("missing".to_string()),
            ..GlobalArgs::default()
        };
        let generate = GenerateArgs::default();
        assert!(build_effective_config(&global, &generate, tmp.path()).is_err());
    }
}
