use std::collections::BTreeMap;

use harvx_types::{FileDescriptor, TierSummary, Tokenizer, TruncationStrategy};

/// Parses a budget string like `128k`, `1m`, `1g`, `unlimited`, or `max`
/// into a token count. `unlimited`/`max` return `usize::MAX`, the
/// sentinel callers treat as "no budget enforcement" — ported verbatim
/// (suffix table, overflow check, error message) from the packer this
/// crate generalizes.
pub fn parse_budget(budget: &str) -> anyhow::Result<usize> {
    let input = budget.trim().to_lowercase();

    if input == "unlimited" || input == "max" {
        return Ok(usize::MAX);
    }

    let (num_str, multiplier) = if let Some(num) = input.strip_suffix('k') {
        (num.trim(), 1_000.0)
    } else if let Some(num) = input.strip_suffix('m') {
        (num.trim(), 1_000_000.0)
    } else if let Some(num) = input.strip_suffix('g') {
        (num.trim(), 1_000_000_000.0)
    } else {
        (input.as_str(), 1.0)
    };

    let n: f64 = num_str.parse().map_err(|_| {
        anyhow::anyhow!(
            "Invalid budget '{}': expected <number>[k|m|g] or 'unlimited' (examples: 128k, 1m, 1g, unlimited)",
            budget.trim()
        )
    })?;

    let result = n * multiplier;
    if result > usize::MAX as f64 {
        anyhow::bail!(
            "Invalid budget '{}': value overflows (max is {})",
            budget.trim(),
            usize::MAX
        );
    }

    Ok(result as usize)
}

/// Outcome of enforcing a token budget over a sorted descriptor list.
#[derive(Debug, Clone, Default)]
pub struct BudgetOutcome {
    pub included: Vec<FileDescriptor>,
    pub excluded: Vec<FileDescriptor>,
    pub truncated_count: usize,
    pub total_tokens: usize,
    pub budget_remaining: i64,
    pub tier_summary: Vec<TierSummary>,
}

/// Enforces `max_tokens` (`None` disables enforcement — all files
/// included) over `sorted`, which must already be in `(tier, path)`
/// order. `overhead` is the renderer's estimated header/summary/footer
/// token cost, reserved before any file is considered.
///
/// Implements spec.md §4.9's algorithm: files are included in order
/// while they fit; under `TruncationStrategy::Truncate`, the first file
/// that doesn't fully fit is truncated to the line boundary nearest the
/// remaining budget and still included; every subsequent file is
/// evaluated against the (now exhausted, or reduced) remaining budget —
/// smaller files later in the order may still fit after a skip.
pub fn enforce_budget(
    sorted: Vec<FileDescriptor>,
    max_tokens: Option<usize>,
    overhead: usize,
    strategy: TruncationStrategy,
    tokenizer: Tokenizer,
) -> BudgetOutcome {
    let Some(max_tokens) = max_tokens.filter(|&m| m > 0) else {
        return unlimited_outcome(sorted);
    };

    let mut remaining: i64 = max_tokens as i64 - overhead as i64;
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    let mut truncated_count = 0usize;
    let mut total_tokens = overhead;

    for mut fd in sorted {
        let fits = remaining >= 0 && fd.token_count as i64 <= remaining;
        if fits {
            remaining -= fd.token_count as i64;
            total_tokens += fd.token_count;
            included.push(fd);
        } else if strategy == TruncationStrategy::Truncate && remaining > 0 {
            let budget = remaining as usize;
            let (content, tokens) =
                harvx_tokenize::truncate_to_budget(&fd.content, tokenizer, budget, fd.token_count);
            fd.content = content;
            fd.token_count = tokens;
            fd.line_count = harvx_tokenize::count_lines(&fd.content);
            total_tokens += fd.token_count;
            truncated_count += 1;
            remaining = 0;
            included.push(fd);
        } else {
            excluded.push(fd);
        }
    }

    BudgetOutcome {
        tier_summary: summarize_tiers(&included),
        included,
        excluded,
        truncated_count,
        total_tokens,
        budget_remaining: remaining,
    }
}

fn unlimited_outcome(files: Vec<FileDescriptor>) -> BudgetOutcome {
    let total_tokens = files.iter().map(|f| f.token_count).sum();
    BudgetOutcome {
        tier_summary: summarize_tiers(&files),
        included: files,
        excluded: Vec::new(),
        truncated_count: 0,
        total_tokens,
        budget_remaining: i64::MAX,
    }
}

fn summarize_tiers(files: &[FileDescriptor]) -> Vec<TierSummary> {
    let mut by_tier: BTreeMap<u8, TierSummary> = BTreeMap::new();
    for fd in files {
        let entry = by_tier.entry(fd.tier).or_insert_with(|| TierSummary {
            tier: fd.tier,
            files: 0,
            tokens: 0,
        });
        entry.files += 1;
        entry.tokens += fd.token_count;
    }
    by_tier.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fd(path: &str, tier: u8, tokens: usize) -> FileDescriptor {
        let mut d = FileDescriptor::new(path.to_string(), PathBuf::from(path), 0);
        d.tier = tier;
        d.token_count = tokens;
        d.content = "x".repeat(tokens.max(1));
        d
    }

    #[test]
    fn parse_budget_suffixes() {
        assert_eq!(parse_budget("128k").unwrap(), 128_000);
        assert_eq!(parse_budget("1m").unwrap(), 1_000_000);
        assert_eq!(parse_budget("1g").unwrap(), 1_000_000_000);
        assert_eq!(parse_budget("500").unwrap(), 500);
    }

    #[test]
    fn parse_budget_unlimited_and_max() {
        assert_eq!(parse_budget("unlimited").unwrap(), usize::MAX);
        assert_eq!(parse_budget("MAX").unwrap(), usize::MAX);
    }

    #[test]
    fn parse_budget_rejects_garbage() {
        assert!(parse_budget("banana").is_err());
    }

    #[test]
    fn zero_max_tokens_disables_enforcement() {
        let files = vec![fd("a", 0, 500), fd("b", 1, 800)];
        let outcome = enforce_budget(files, Some(0), 0, TruncationStrategy::Skip, Tokenizer::None);
        assert_eq!(outcome.included.len(), 2);
        assert!(outcome.excluded.is_empty());
    }

    #[test]
    fn none_max_tokens_includes_everything() {
        let files = vec![fd("a", 0, 500), fd("b", 1, 800)];
        let outcome = enforce_budget(files, None, 0, TruncationStrategy::Skip, Tokenizer::None);
        assert_eq!(outcome.included.len(), 2);
        assert!(outcome.excluded.is_empty());
    }

    #[test]
    fn skip_strategy_excludes_overflowing_file_scenario_3() {
        let files = vec![fd("a", 0, 500), fd("b", 0, 800), fd("c", 0, 200)];
        let outcome = enforce_budget(
            files,
            Some(1000),
            0,
            TruncationStrategy::Skip,
            Tokenizer::None,
        );
        let included: Vec<_> = outcome.included.iter().map(|f| f.path.clone()).collect();
        assert_eq!(included, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(outcome.excluded.len(), 1);
        assert_eq!(outcome.excluded[0].path, "b");
        assert_eq!(outcome.budget_remaining, 300);
    }

    #[test]
    fn truncate_strategy_includes_all_with_marker_scenario_4() {
        let files = vec![fd("a", 0, 500), fd("b", 0, 800), fd("c", 0, 200)];
        let outcome = enforce_budget(
            files,
            Some(1000),
            0,
            TruncationStrategy::Truncate,
            Tokenizer::None,
        );
        assert_eq!(outcome.included.len(), 3);
        assert_eq!(outcome.truncated_count, 1);
        let truncated = outcome.included.iter().find(|f| f.path == "b").unwrap();
        assert!(truncated.content.contains("Content truncated"));
    }

    #[test]
    fn overhead_is_reserved_before_any_file() {
        let files = vec![fd("a", 0, 500)];
        let outcome = enforce_budget(
            files,
            Some(500),
            500,
            TruncationStrategy::Skip,
            Tokenizer::None,
        );
        assert!(outcome.included.is_empty());
    }

    #[test]
    fn tier_summary_aggregates_by_tier() {
        let files = vec![fd("a", 0, 100), fd("b", 0, 50), fd("c", 1, 200)];
        let outcome = enforce_budget(
            files,
            Some(10_000),
            0,
            TruncationStrategy::Skip,
            Tokenizer::None,
        );
        let tier0 = outcome.tier_summary.iter().find(|t| t.tier == 0).unwrap();
        assert_eq!(tier0.files, 2);
        assert_eq!(tier0.tokens, 150);
    }
}
