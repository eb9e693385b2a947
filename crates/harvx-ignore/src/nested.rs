use std::path::{Path, PathBuf};

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// A single directory's ignore file (`.gitignore` or `.harvxignore`),
/// compiled with faithful git semantics (negation, directory-only
/// patterns, doublestar) via the `ignore` crate.
pub struct NestedLayer {
    base: PathBuf,
    gitignore: Gitignore,
}

impl NestedLayer {
    /// Loads `dir/<filename>` if present and non-empty. Returns `None`
    /// when the file doesn't exist, matching the "only push a layer
    /// when a file is actually found" walker contract.
    pub fn load(dir: &Path, filename: &str) -> anyhow::Result<Option<Self>> {
        let path = dir.join(filename);
        if !path.is_file() {
            return Ok(None);
        }
        let mut builder = GitignoreBuilder::new(dir);
        if let Some(err) = builder.add(&path) {
            return Err(anyhow::anyhow!(err));
        }
        let gitignore = builder.build()?;
        Ok(Some(Self { base: dir.to_path_buf(), gitignore }))
    }

    /// This layer's base directory; the layer only ever applies to
    /// paths under it.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Matches `abs_path` against this layer, returning whether it's a
    /// non-negated ignore match, a negated (re-include) match, or no
    /// match at all.
    #[must_use]
    pub fn matched(&self, abs_path: &Path, is_dir: bool) -> NestedMatch {
        match self.gitignore.matched(abs_path, is_dir) {
            ignore::Match::None => NestedMatch::None,
            ignore::Match::Ignore(_) => NestedMatch::Ignore,
            ignore::Match::Whitelist(_) => NestedMatch::Whitelist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedMatch {
    /// Nothing in this layer's patterns touched the path.
    None,
    /// A pattern matched and the path is ignored.
    Ignore,
    /// A later negation pattern re-included the path.
    Whitelist,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_gitignore_and_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        let layer = NestedLayer::load(dir.path(), ".gitignore").unwrap().unwrap();
        let path = dir.path().join("debug.log");
        assert_eq!(layer.matched(&path, false), NestedMatch::Ignore);
    }

    #[test]
    fn negation_whitelists() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n!keep.log\n").unwrap();
        let layer = NestedLayer::load(dir.path(), ".gitignore").unwrap().unwrap();
        let keep = dir.path().join("keep.log");
        assert_eq!(layer.matched(&keep, false), NestedMatch::Whitelist);
    }

    #[test]
    fn missing_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(NestedLayer::load(dir.path(), ".gitignore").unwrap().is_none());
    }

    #[test]
    fn harvxignore_same_syntax() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".harvxignore"), "secrets/\n").unwrap();
        let layer = NestedLayer::load(dir.path(), ".harvxignore").unwrap().unwrap();
        let path = dir.path().join("secrets").join("a.txt");
        assert_eq!(layer.matched(&path, false), NestedMatch::Ignore);
    }
}
