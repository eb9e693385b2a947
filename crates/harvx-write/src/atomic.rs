use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::tee::CountingHashWriter;

/// Outcome of one completed write, regardless of destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub bytes_written: u64,
    pub content_hash: String,
}

/// Writes `path` atomically: render into a temp file in the same
/// directory (so the final rename is same-filesystem), `fsync` it, then
/// rename over the destination. A reader never observes a partially
/// written artifact. Carried over from the teacher's
/// `create_new`-unless-`--force` collision check, generalized from a
/// direct `File::create` to temp-file-then-rename so a crash mid-write
/// can't leave a truncated file at `path`.
///
/// `render` is called exactly once with a writer that tees every byte
/// through a BLAKE3 hasher.
pub fn write_atomic<F>(path: &Path, force: bool, render: F) -> Result<WriteOutcome>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    if !force && path.exists() {
        bail!(
            "Output file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create output directory: {}", parent.display()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".harvx-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;

    let outcome = {
        let mut counting = CountingHashWriter::new(tmp.as_file_mut());
        render(&mut counting)?;
        counting.flush()?;
        WriteOutcome { bytes_written: counting.bytes(), content_hash: counting.content_hash() }
    };

    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to fsync temp file for {}", path.display()))?;

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to finalize output file: {}", path.display()))?;

    Ok(outcome)
}

/// Writes directly to stdout; no atomicity to speak of, but it shares
/// the same hashing/counting tee so `--output-metadata` and the
/// redaction report behave identically regardless of destination.
pub fn write_stdout<F>(render: F) -> Result<WriteOutcome>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let stdout = io::stdout();
    let mut counting = CountingHashWriter::new(stdout.lock());
    render(&mut counting)?;
    counting.flush()?;
    Ok(WriteOutcome { bytes_written: counting.bytes(), content_hash: counting.content_hash() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_file_and_reports_hash_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        let outcome = write_atomic(&path, false, |w| {
            w.write_all(b"hello")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(outcome.bytes_written, 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert_eq!(outcome.content_hash, blake3::hash(b"hello").to_hex().to_string());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        fs::write(&path, "existing").unwrap();
        let err = write_atomic(&path, false, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");
    }

    #[test]
    fn force_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        fs::write(&path, "existing").unwrap();
        write_atomic(&path, true, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn no_temp_file_left_behind_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        write_atomic(&path, false, |w| {
            w.write_all(b"x")?;
            Ok(())
        })
        .unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".harvx-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deep/out.md");
        write_atomic(&path, false, |w| {
            w.write_all(b"x")?;
            Ok(())
        })
        .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn stdout_write_reports_consistent_hash() {
        let outcome = write_stdout(|w| {
            w.write_all(b"piped")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(outcome.bytes_written, 5);
        assert_eq!(outcome.content_hash, blake3::hash(b"piped").to_hex().to_string());
    }
}
