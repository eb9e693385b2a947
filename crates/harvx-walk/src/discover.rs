use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSetBuilder};
use harvx_ignore::IgnoreEngine;
use harvx_path::normalize_rel_path;
use harvx_types::FileDescriptor;

use crate::binary::looks_binary;
use crate::git_tracked::git_ls_files;

/// Default per-file size cap, in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct WalkConfig {
    pub max_file_size: u64,
    pub git_tracked_only: bool,
    pub include: Vec<String>,
    pub extensions: Vec<String>,
    pub cli_exclude: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            git_tracked_only: false,
            include: Vec::new(),
            extensions: Vec::new(),
            cli_exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    TooLarge { size: u64, limit: u64 },
    Binary,
    NotGitTracked,
    SymlinkLoop,
    DanglingSymlink,
    NotIncluded,
}

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct DiscoverOutcome {
    pub files: Vec<FileDescriptor>,
    pub warnings: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

struct IncludeFilter {
    include: Option<globset::GlobSet>,
    extensions: HashSet<String>,
}

impl IncludeFilter {
    fn compile(cfg: &WalkConfig) -> Result<Self> {
        let include = if cfg.include.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for p in &cfg.include {
                builder.add(Glob::new(p)?);
            }
            Some(builder.build()?)
        };
        let extensions = cfg
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        Ok(Self { include, extensions })
    }

    fn active(&self) -> bool {
        self.include.is_some() || !self.extensions.is_empty()
    }

    fn matches(&self, rel_path: &str) -> bool {
        if !self.active() {
            return true;
        }
        let include_hit = self.include.as_ref().is_some_and(|s| s.is_match(rel_path));
        let ext_hit = !self.extensions.is_empty()
            && Path::new(rel_path)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| self.extensions.contains(&e.to_lowercase()));
        include_hit || ext_hit
    }
}

/// Traverses `root` in lexicographic order, pruning ignored subtrees
/// without descending into them, and returns every surviving file as a
/// content-empty [`FileDescriptor`] (spec.md §4.3, steps 1-4, 6; content
/// loading is a separate, parallel stage — see [`crate::load_parallel`]).
pub fn discover(root: &Path, cfg: &WalkConfig) -> Result<DiscoverOutcome> {
    if !root.is_dir() {
        anyhow::bail!("walk root is not a directory: {}", root.display());
    }

    let git_whitelist = if cfg.git_tracked_only {
        Some(git_ls_files(root)?)
    } else {
        None
    };

    let mut ignore = IgnoreEngine::new(root, &cfg.cli_exclude)?;
    let include_filter = IncludeFilter::compile(cfg)?;
    let mut outcome = DiscoverOutcome::default();
    let mut visited_real_dirs: HashSet<PathBuf> = HashSet::new();
    if let Ok(real_root) = fs::canonicalize(root) {
        visited_real_dirs.insert(real_root);
    }
    let mut candidates: HashMap<String, (PathBuf, u64)> = HashMap::new();

    let root_entered = ignore.enter_dir(root)?;
    walk_dir(
        root,
        root,
        &mut ignore,
        &mut visited_real_dirs,
        cfg,
        &git_whitelist,
        &include_filter,
        &mut candidates,
        &mut outcome,
    )?;
    ignore.leave_dir(root_entered);

    let mut files: Vec<FileDescriptor> = candidates
        .into_iter()
        .map(|(rel, (abs, size))| FileDescriptor::new(rel, abs, size))
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    outcome.files = files;
    Ok(outcome)
}

#[allow(clippy::too_many_arguments)]
fn walk_dir(
    root: &Path,
    dir: &Path,
    ignore: &mut IgnoreEngine,
    visited_real_dirs: &mut HashSet<PathBuf>,
    cfg: &WalkConfig,
    git_whitelist: &Option<HashSet<String>>,
    include_filter: &IncludeFilter,
    candidates: &mut HashMap<String, (PathBuf, u64)>,
    outcome: &mut DiscoverOutcome,
) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("reading directory entries in {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let rel = normalize_rel_path(
            path.strip_prefix(root).unwrap_or(&path).to_string_lossy().as_ref(),
        );
        let file_type = entry.file_type().with_context(|| format!("stat {}", path.display()))?;

        if file_type.is_symlink() {
            match fs::canonicalize(&path) {
                Err(_) => {
                    outcome.warnings.push(format!("dangling symlink skipped: {rel}"));
                    outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::DanglingSymlink });
                    continue;
                }
                Ok(real) => {
                    if real.is_dir() {
                        if visited_real_dirs.contains(&real) {
                            outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::SymlinkLoop });
                            continue;
                        }
                        let decision = ignore.is_ignored(&rel, &path, true);
                        if decision.ignored {
                            outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::Ignored });
                            continue;
                        }
                        if let Some(w) = decision.suppressed_sensitive_warning {
                            outcome.warnings.push(w);
                        }
                        visited_real_dirs.insert(real.clone());
                        let entered = ignore.enter_dir(&path)?;
                        walk_dir(
                            root, &path, ignore, visited_real_dirs, cfg, git_whitelist,
                            include_filter, candidates, outcome,
                        )?;
                        ignore.leave_dir(entered);
                        visited_real_dirs.remove(&real);
                        continue;
                    }
                    process_file(root, &path, rel, ignore, cfg, git_whitelist, include_filter, candidates, outcome);
                    continue;
                }
            }
        }

        if file_type.is_dir() {
            let decision = ignore.is_ignored(&rel, &path, true);
            if decision.ignored {
                outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::Ignored });
                continue;
            }
            if let Some(w) = decision.suppressed_sensitive_warning {
                outcome.warnings.push(w);
            }
            let real = fs::canonicalize(&path).ok();
            if let Some(real) = &real {
                if visited_real_dirs.contains(real) {
                    outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::SymlinkLoop });
                    continue;
                }
                visited_real_dirs.insert(real.clone());
            }
            let entered = ignore.enter_dir(&path)?;
            walk_dir(
                root, &path, ignore, visited_real_dirs, cfg, git_whitelist, include_filter,
                candidates, outcome,
            )?;
            ignore.leave_dir(entered);
            if let Some(real) = &real {
                visited_real_dirs.remove(real);
            }
        } else if file_type.is_file() {
            process_file(root, &path, rel, ignore, cfg, git_whitelist, include_filter, candidates, outcome);
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn process_file(
    _root: &Path,
    abs_path: &Path,
    rel: String,
    ignore: &IgnoreEngine,
    cfg: &WalkConfig,
    git_whitelist: &Option<HashSet<String>>,
    include_filter: &IncludeFilter,
    candidates: &mut HashMap<String, (PathBuf, u64)>,
    outcome: &mut DiscoverOutcome,
) {
    let decision = ignore.is_ignored(&rel, abs_path, false);
    if decision.ignored {
        outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::Ignored });
        return;
    }
    if let Some(w) = decision.suppressed_sensitive_warning {
        outcome.warnings.push(w);
    }

    if let Some(whitelist) = git_whitelist {
        if !whitelist.contains(&rel) {
            outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::NotGitTracked });
            return;
        }
    }

    let size = match fs::metadata(abs_path) {
        Ok(meta) => meta.len(),
        Err(_) => return,
    };
    if size > cfg.max_file_size {
        outcome.skipped.push(SkippedFile {
            path: rel,
            reason: SkipReason::TooLarge { size, limit: cfg.max_file_size },
        });
        return;
    }

    if looks_binary(abs_path) {
        outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::Binary });
        return;
    }

    if !include_filter.matches(&rel) {
        outcome.skipped.push(SkippedFile { path: rel, reason: SkipReason::NotIncluded });
        return;
    }

    candidates.insert(rel, (abs_path.to_path_buf(), size));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.ts"), "console.log(1)").unwrap();
        dir
    }

    #[test]
    fn default_ignores_scenario_one() {
        let dir = setup();
        let outcome = discover(dir.path(), &WalkConfig::default()).unwrap();
        let paths: Vec<_> = outcome.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/app.ts"]);
    }

    #[test]
    fn size_limit_skips_large_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.bin"), vec![b'x'; 100]).unwrap();
        let cfg = WalkConfig { max_file_size: 10, ..WalkConfig::default() };
        let outcome = discover(dir.path(), &cfg).unwrap();
        assert!(outcome.files.is_empty());
        assert!(outcome
            .skipped
            .iter()
            .any(|s| matches!(s.reason, SkipReason::TooLarge { .. })));
    }

    #[test]
    fn binary_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.bin"), [0u8, 1, 2, 3]).unwrap();
        let outcome = discover(dir.path(), &WalkConfig::default()).unwrap();
        assert!(outcome.files.is_empty());
        assert!(outcome.skipped.iter().any(|s| s.reason == SkipReason::Binary));
    }

    #[test]
    fn include_pattern_requires_match() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn main() {}").unwrap();
        fs::write(dir.path().join("a.md"), "# doc").unwrap();
        let cfg = WalkConfig { include: vec!["**/*.rs".into()], ..WalkConfig::default() };
        let outcome = discover(dir.path(), &cfg).unwrap();
        let paths: Vec<_> = outcome.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.rs"]);
    }

    #[test]
    fn extension_filter_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.RS"), "fn main() {}").unwrap();
        let cfg = WalkConfig { extensions: vec!["rs".into()], ..WalkConfig::default() };
        let outcome = discover(dir.path(), &cfg).unwrap();
        assert_eq!(outcome.files.len(), 1);
    }

    #[test]
    fn dangling_symlink_is_skipped_with_warning() {
        #[cfg(unix)]
        {
            let dir = tempfile::tempdir().unwrap();
            std::os::unix::fs::symlink(dir.path().join("missing"), dir.path().join("dangling")).unwrap();
            let outcome = discover(dir.path(), &WalkConfig::default()).unwrap();
            assert!(outcome.files.is_empty());
            assert!(outcome.skipped.iter().any(|s| s.reason == SkipReason::DanglingSymlink));
        }
    }

    #[test]
    fn symlink_loop_is_skipped() {
        #[cfg(unix)]
        {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("real")).unwrap();
            std::os::unix::fs::symlink(dir.path(), dir.path().join("real/loop")).unwrap();
            let outcome = discover(dir.path(), &WalkConfig::default()).unwrap();
            assert!(outcome.skipped.iter().any(|s| s.reason == SkipReason::SymlinkLoop));
        }
    }

    #[test]
    fn non_directory_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "x").unwrap();
        assert!(discover(&file, &WalkConfig::default()).is_err());
    }

    #[test]
    fn results_are_sorted_by_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("z.rs"), "z").unwrap();
        fs::write(dir.path().join("a.rs"), "a").unwrap();
        let outcome = discover(dir.path(), &WalkConfig::default()).unwrap();
        let paths: Vec<_> = outcome.files.iter().map(|f| f.path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }
}
