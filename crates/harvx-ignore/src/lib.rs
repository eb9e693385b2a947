//! # harvx-ignore
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! The composite ignore engine: four layered sources — built-in
//! defaults, nested `.gitignore`, nested `.harvxignore`, and CLI
//! `--exclude` globs — folded in order so a later layer's negation can
//! re-include a path an earlier layer ignored, except nothing can
//! override the CLI exclude layer, which is folded last.
//!
//! The walker pushes/pops nested layers as it descends/ascends the
//! directory tree via [`IgnoreEngine::enter_dir`]/[`IgnoreEngine::leave_dir`];
//! each query considers the ancestor chain currently on the stack.

mod cli_exclude;
mod defaults;
mod nested;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use cli_exclude::CliExclude;
pub use defaults::DefaultIgnore;
pub use nested::{NestedLayer, NestedMatch};

/// The outcome of evaluating a path against every active layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreDecision {
    pub ignored: bool,
    /// Set when a nested ignore file suppressed (whitelisted) a
    /// built-in sensitive default pattern for this path.
    pub suppressed_sensitive_warning: Option<String>,
}

impl IgnoreDecision {
    fn included() -> Self {
        Self { ignored: false, suppressed_sensitive_warning: None }
    }
}

/// Tracks how many layers [`IgnoreEngine::enter_dir`] pushed, so the
/// matching [`IgnoreEngine::leave_dir`] call pops exactly that many.
#[derive(Debug, Default)]
pub struct EnteredLayers {
    git_pushed: bool,
    harvx_pushed: bool,
}

/// Composite ignore engine over a single walk root.
pub struct IgnoreEngine {
    root: PathBuf,
    defaults: DefaultIgnore,
    cli: CliExclude,
    git_layers: Vec<NestedLayer>,
    harvx_layers: Vec<NestedLayer>,
}

impl IgnoreEngine {
    pub fn new(root: &Path, cli_exclude_patterns: &[String]) -> Result<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            defaults: DefaultIgnore::compiled()?,
            cli: CliExclude::compile(cli_exclude_patterns)?,
            git_layers: Vec::new(),
            harvx_layers: Vec::new(),
        })
    }

    /// Call when the walker starts descending into `dir`: loads and
    /// pushes `.gitignore`/`.harvxignore` layers found directly in
    /// `dir`, if any.
    pub fn enter_dir(&mut self, dir: &Path) -> Result<EnteredLayers> {
        let mut entered = EnteredLayers::default();
        if let Some(layer) = NestedLayer::load(dir, ".gitignore")? {
            self.git_layers.push(layer);
            entered.git_pushed = true;
        }
        if let Some(layer) = NestedLayer::load(dir, ".harvxignore")? {
            self.harvx_layers.push(layer);
            entered.harvx_pushed = true;
        }
        Ok(entered)
    }

    /// Call when the walker finishes a directory, undoing exactly what
    /// the matching `enter_dir` pushed.
    pub fn leave_dir(&mut self, entered: EnteredLayers) {
        if entered.harvx_pushed {
            self.harvx_layers.pop();
        }
        if entered.git_pushed {
            self.git_layers.pop();
        }
    }

    /// Evaluates `abs_path` (relative form `rel_path` used for the
    /// default/CLI glob layers) against every active layer, in source
    /// order, folding later-overrides-earlier except for the CLI
    /// exclude layer which is applied last and unconditionally.
    #[must_use]
    pub fn is_ignored(&self, rel_path: &str, abs_path: &Path, is_dir: bool) -> IgnoreDecision {
        let mut ignored = false;
        let mut warning = None;

        if let Some(sensitive) = self.defaults.matching_sensitive_pattern(rel_path) {
            ignored = true;
            let _ = sensitive;
        } else if self.defaults.matching_pattern(rel_path).is_some() {
            ignored = true;
        }

        for layer in &self.git_layers {
            match layer.matched(abs_path, is_dir) {
                NestedMatch::Ignore => ignored = true,
                NestedMatch::Whitelist => {
                    if ignored && warning.is_none() {
                        if let Some(p) = self.defaults.matching_sensitive_pattern(rel_path) {
                            warning = Some(format!(
                                "sensitive default pattern `{p}` suppressed for `{rel_path}` by .gitignore"
                            ));
                        }
                    }
                    ignored = false;
                }
                NestedMatch::None => {}
            }
        }

        for layer in &self.harvx_layers {
            match layer.matched(abs_path, is_dir) {
                NestedMatch::Ignore => ignored = true,
                NestedMatch::Whitelist => {
                    if ignored && warning.is_none() {
                        if let Some(p) = self.defaults.matching_sensitive_pattern(rel_path) {
                            warning = Some(format!(
                                "sensitive default pattern `{p}` suppressed for `{rel_path}` by .harvxignore"
                            ));
                        }
                    }
                    ignored = false;
                }
                NestedMatch::None => {}
            }
        }

        if self.cli.is_excluded(rel_path) {
            ignored = true;
        }

        if !ignored {
            return IgnoreDecision::included();
        }
        IgnoreDecision { ignored: true, suppressed_sensitive_warning: warning }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
