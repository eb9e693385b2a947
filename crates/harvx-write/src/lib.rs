//! # harvx-write
//!
//! **Tier 1 (Pipeline Stage)**
//!
//! The final pipeline stage: takes rendered bytes and lands them on
//! disk (or stdout) the way spec.md §4.11 demands — atomically, with a
//! BLAKE3 content hash computed in the same pass, and optionally split
//! across numbered parts (§4.11, `--split N`).
//!
//! [`atomic`] owns the temp-file/fsync/rename dance and the stdout
//! fallback; [`tee`] is the byte-counting hashing writer both paths
//! wrap their output in; [`split`] greedily partitions an already
//! tier/path-ordered file list into parts without ever splitting a
//! single file across two of them.

pub mod atomic;
pub mod split;
pub mod tee;

pub use atomic::{write_atomic, write_stdout, WriteOutcome};
pub use split::{part_file_name, split_into_parts, OversizedFileWarning, Part};
pub use tee::CountingHashWriter;
