use globset::{Glob, GlobSet, GlobSetBuilder};

/// CLI `--exclude` glob patterns, the highest-precedence layer: nothing
/// downstream (a later `.gitignore` negation, a profile include list)
/// can override a CLI exclude.
pub struct CliExclude {
    set: GlobSet,
}

impl CliExclude {
    pub fn compile(patterns: &[String]) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self { set: builder.build()? })
    }

    #[must_use]
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }
}
