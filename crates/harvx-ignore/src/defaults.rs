use globset::{Glob, GlobSet, GlobSetBuilder};

/// One built-in ignore pattern. `sensitive` marks patterns where a later
/// layer suppressing them is worth a warning (spec.md §4.2).
struct DefaultPattern {
    glob: &'static str,
    sensitive: bool,
}

/// VCS directories, build outputs, lockfiles, compiled artifacts,
/// OS/editor noise, environment files, and sensitive-name patterns.
const PATTERNS: &[DefaultPattern] = &[
    // VCS
    DefaultPattern { glob: "**/.git/**", sensitive: false },
    DefaultPattern { glob: "**/.svn/**", sensitive: false },
    DefaultPattern { glob: "**/.hg/**", sensitive: false },
    // Build outputs
    DefaultPattern { glob: "**/target/**", sensitive: false },
    DefaultPattern { glob: "**/dist/**", sensitive: false },
    DefaultPattern { glob: "**/build/**", sensitive: false },
    DefaultPattern { glob: "**/node_modules/**", sensitive: false },
    DefaultPattern { glob: "**/.venv/**", sensitive: false },
    DefaultPattern { glob: "**/venv/**", sensitive: false },
    DefaultPattern { glob: "**/__pycache__/**", sensitive: false },
    DefaultPattern { glob: "**/.next/**", sensitive: false },
    DefaultPattern { glob: "**/.nuxt/**", sensitive: false },
    // Lockfiles
    DefaultPattern { glob: "**/Cargo.lock", sensitive: false },
    DefaultPattern { glob: "**/package-lock.json", sensitive: false },
    DefaultPattern { glob: "**/pnpm-lock.yaml", sensitive: false },
    DefaultPattern { glob: "**/yarn.lock", sensitive: false },
    DefaultPattern { glob: "**/poetry.lock", sensitive: false },
    DefaultPattern { glob: "**/Gemfile.lock", sensitive: false },
    // Compiled artifacts
    DefaultPattern { glob: "**/*.o", sensitive: false },
    DefaultPattern { glob: "**/*.so", sensitive: false },
    DefaultPattern { glob: "**/*.dylib", sensitive: false },
    DefaultPattern { glob: "**/*.dll", sensitive: false },
    DefaultPattern { glob: "**/*.class", sensitive: false },
    DefaultPattern { glob: "**/*.pyc", sensitive: false },
    DefaultPattern { glob: "**/*.wasm", sensitive: false },
    // OS / editor noise
    DefaultPattern { glob: "**/.DS_Store", sensitive: false },
    DefaultPattern { glob: "**/Thumbs.db", sensitive: false },
    DefaultPattern { glob: "**/.idea/**", sensitive: false },
    DefaultPattern { glob: "**/.vscode/**", sensitive: false },
    DefaultPattern { glob: "**/*.swp", sensitive: false },
    // Environment files
    DefaultPattern { glob: "**/.env", sensitive: true },
    DefaultPattern { glob: "**/.env.*", sensitive: true },
    // Sensitive-name patterns
    DefaultPattern { glob: "**/*.pem", sensitive: true },
    DefaultPattern { glob: "**/*.key", sensitive: true },
    DefaultPattern { glob: "**/id_rsa", sensitive: true },
    DefaultPattern { glob: "**/id_rsa.pub", sensitive: true },
    DefaultPattern { glob: "**/*.p12", sensitive: true },
    DefaultPattern { glob: "**/*.pfx", sensitive: true },
    DefaultPattern { glob: "**/.npmrc", sensitive: true },
    DefaultPattern { glob: "**/.netrc", sensitive: true },
];

/// The compiled built-in default ignore set.
pub struct DefaultIgnore {
    set: GlobSet,
}

impl DefaultIgnore {
    /// Compiles the built-in pattern table. Patterns are authored
    /// constants so this cannot fail in practice, but returns `Result`
    /// to match the fallible-by-convention shape of the other layers.
    pub fn compiled() -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for p in PATTERNS {
            builder.add(Glob::new(p.glob)?);
        }
        Ok(Self { set: builder.build()? })
    }

    /// Returns `Some(pattern)` when `rel_path` matches a built-in
    /// pattern, regardless of its sensitivity.
    #[must_use]
    pub fn matching_pattern(&self, rel_path: &str) -> Option<&'static str> {
        self.set
            .matches(rel_path)
            .into_iter()
            .next()
            .map(|i| PATTERNS[i].glob)
    }

    /// Returns the pattern string when `rel_path` matches a
    /// *sensitive* built-in pattern (e.g. `*.pem`), for the "overridden
    /// sensitive default" warning.
    #[must_use]
    pub fn matching_sensitive_pattern(&self, rel_path: &str) -> Option<&'static str> {
        self.set
            .matches(rel_path)
            .into_iter()
            .map(|i| &PATTERNS[i])
            .find(|p| p.sensitive)
            .map(|p| p.glob)
    }
}
