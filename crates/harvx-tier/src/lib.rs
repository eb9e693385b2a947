//! # harvx-tier
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! Assigns each discovered file a relevance tier (0 highest, 5 lowest)
//! from a profile's `tier_definitions`, generalizing
//! `tokmd-context-policy`'s fixed-category classification into
//! profile-supplied, doublestar glob tier rules (spec.md §4.4).

use globset::{Glob, GlobSet, GlobSetBuilder};
use harvx_path::normalize_rel_path;
use harvx_types::{TierDefinition, DEFAULT_TIER};

/// A compiled tier definition: an include `GlobSet` and an optional
/// exclude `GlobSet` (patterns prefixed `!` in the profile's pattern
/// list), per tier, in the profile's own definition order (lowest tier
/// number classified first wins on a tie, but since each tier number is
/// distinct the "lowest tier matching" rule is really "first
/// definition, in ascending tier order, whose pattern set matches").
/// The exclude set lets a tier's own patterns carve out a narrower
/// match (e.g. "every file under `src/` except test files") without
/// needing a cross-tier precedence rule.
pub struct TierClassifier {
    compiled: Vec<(u8, GlobSet, Option<GlobSet>)>,
}

impl TierClassifier {
    /// Compiles `definitions` in the order given. Definitions are not
    /// required to be sorted by tier number; [`classify`] always
    /// iterates in the given order and returns the tier of the first
    /// matching definition, so an unsorted caller changes which tier
    /// wins on overlapping patterns. Profiles are expected to supply
    /// them tier-ascending, matching `default_tier_definitions`.
    ///
    /// A pattern prefixed with `!` is an exclusion within that same
    /// definition: the definition matches a path only if it matches at
    /// least one non-`!` pattern and no `!` pattern.
    pub fn compile(definitions: &[TierDefinition]) -> anyhow::Result<Self> {
        let mut compiled = Vec::with_capacity(definitions.len());
        for def in definitions {
            let mut include = GlobSetBuilder::new();
            let mut exclude = GlobSetBuilder::new();
            let mut has_exclude = false;
            for pattern in &def.patterns {
                if let Some(negated) = pattern.strip_prefix('!') {
                    exclude.add(Glob::new(negated)?);
                    has_exclude = true;
                } else {
                    include.add(Glob::new(pattern)?);
                }
            }
            let exclude = has_exclude.then(|| exclude.build()).transpose()?;
            compiled.push((def.tier, include.build()?, exclude));
        }
        Ok(Self { compiled })
    }

    /// Returns the lowest-numbered tier whose pattern set matches
    /// `path`, trying definitions in compiled order; falls back to
    /// [`DEFAULT_TIER`] when nothing matches.
    #[must_use]
    pub fn classify(&self, path: &str) -> u8 {
        let normalized = normalize_rel_path(path);
        self.compiled
            .iter()
            .find(|(_, include, exclude)| {
                include.is_match(&normalized)
                    && !exclude.as_ref().is_some_and(|set| set.is_match(&normalized))
            })
            .map(|(tier, _, _)| *tier)
            .unwrap_or(DEFAULT_TIER)
    }
}
