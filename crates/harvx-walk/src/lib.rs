//! # harvx-walk
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! Single-threaded, lexicographically-ordered directory traversal
//! (ignore-aware, symlink-safe, git-tracked-only/size/binary filtering)
//! plus a bounded-parallel content loader, per spec.md §4.3.

mod binary;
mod cancel;
mod discover;
mod git_tracked;
mod loader;

pub use cancel::CancellationToken;
pub use discover::{discover, DiscoverOutcome, SkipReason, SkippedFile, WalkConfig, DEFAULT_MAX_FILE_SIZE};
pub use git_tracked::git_ls_files;
pub use loader::load_parallel;
