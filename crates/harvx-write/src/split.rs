use std::path::{Path, PathBuf};

use harvx_types::RenderFileEntry;

/// One greedily-packed output part. `files` never splits a single file
/// across parts.
#[derive(Debug, Clone, Default)]
pub struct Part {
    pub files: Vec<RenderFileEntry>,
    pub tokens: usize,
}

/// Warning raised when a single file's token count already exceeds the
/// adjusted per-part budget; it still gets written, alone, as its own
/// part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OversizedFileWarning {
    pub path: String,
    pub tokens: usize,
    pub budget: usize,
}

/// Greedily partitions `files` (already in final render order) into
/// parts of at most `max_tokens_per_part` tokens each, net of
/// `header_overhead_tokens` reserved per part for the summary/header
/// boilerplate every part's renderer emits. Never splits one file
/// across two parts.
#[must_use]
pub fn split_into_parts(
    files: &[RenderFileEntry],
    max_tokens_per_part: usize,
    header_overhead_tokens: usize,
) -> (Vec<Part>, Vec<OversizedFileWarning>) {
    let budget = max_tokens_per_part.saturating_sub(header_overhead_tokens).max(1);
    let mut parts = Vec::new();
    let mut warnings = Vec::new();
    let mut current = Part::default();

    for file in files {
        if file.token_count > budget {
            warnings.push(OversizedFileWarning {
                path: file.path.clone(),
                tokens: file.token_count,
                budget,
            });
        }
        let would_overflow = current.tokens + file.token_count > budget && !current.files.is_empty();
        if would_overflow {
            parts.push(std::mem::take(&mut current));
        }
        current.tokens += file.token_count;
        current.files.push(file.clone());
    }
    if !current.files.is_empty() {
        parts.push(current);
    }
    if parts.is_empty() {
        parts.push(Part::default());
    }
    (parts, warnings)
}

/// File name for part `index` (1-based) of `total_parts`. A
/// single-part result keeps `base` unsuffixed; otherwise
/// `<stem>.part-NNN.<ext>`, zero-padded to three digits.
#[must_use]
pub fn part_file_name(base: &Path, index: usize, total_parts: usize) -> PathBuf {
    if total_parts <= 1 {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let ext = base.extension().and_then(|s| s.to_str());
    let file_name = match ext {
        Some(ext) => format!("{stem}.part-{index:03}.{ext}"),
        None => format!("{stem}.part-{index:03}"),
    };
    match base.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, tokens: usize) -> RenderFileEntry {
        RenderFileEntry {
            path: path.to_string(),
            size: 0,
            tier: 2,
            language: String::new(),
            token_count: tokens,
            line_count: 0,
            content: String::new(),
            is_compressed: false,
            truncated: false,
        }
    }

    #[test]
    fn packs_greedily_without_splitting_a_file() {
        let files = vec![file("a", 60_000), file("b", 60_000), file("c", 60_000), file("d", 30_000)];
        let (parts, warnings) = split_into_parts(&files, 100_000, 0);
        assert!(warnings.is_empty());
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(parts[1].files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(parts[2].files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>(), vec!["c", "d"]);
    }

    #[test]
    fn two_hundred_ten_k_at_hundred_k_budget_makes_three_parts() {
        let files = vec![file("a", 70_000), file("b", 70_000), file("c", 70_000)];
        let (parts, _) = split_into_parts(&files, 100_000, 0);
        assert_eq!(parts.len(), 3);
        let total_tokens: usize = parts.iter().map(|p| p.tokens).sum();
        assert_eq!(total_tokens, 210_000);
    }

    #[test]
    fn oversized_single_file_becomes_its_own_part_with_a_warning() {
        let files = vec![file("big", 150_000)];
        let (parts, warnings) = split_into_parts(&files, 100_000, 0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].files.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].path, "big");
    }

    #[test]
    fn empty_input_produces_a_single_empty_part() {
        let (parts, warnings) = split_into_parts(&[], 100_000, 0);
        assert_eq!(parts.len(), 1);
        assert!(parts[0].files.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn header_overhead_shrinks_effective_budget() {
        let files = vec![file("a", 60_000), file("b", 60_000)];
        let (parts, _) = split_into_parts(&files, 100_000, 50_000);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn single_part_keeps_base_name_unsuffixed() {
        let base = Path::new("out/context.md");
        assert_eq!(part_file_name(base, 1, 1), base);
    }

    #[test]
    fn multi_part_names_are_zero_padded_and_preserve_extension() {
        let base = Path::new("out/context.md");
        assert_eq!(part_file_name(base, 1, 3), Path::new("out/context.part-001.md"));
        assert_eq!(part_file_name(base, 12, 12), Path::new("out/context.part-012.md"));
    }

    #[test]
    fn multi_part_extensionless_base_has_no_trailing_dot() {
        let base = Path::new("out/context");
        assert_eq!(part_file_name(base, 1, 2), Path::new("out/context.part-001"));
    }
}
