use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Result};

/// Builds the `--git-tracked-only` whitelist by invoking `git ls-files`
/// in `root` once and parsing its NUL-delimited relative paths. A
/// non-git root or a missing `git` binary is a fatal setup error (spec.md
/// §7), unlike `tokmd-walk::git_ls_files`, which treats git absence as a
/// silent fallback to a full filesystem walk — the `--git-tracked-only`
/// flag is an explicit request that git scope the walk, so its absence
/// must surface.
pub fn git_ls_files(root: &Path) -> Result<HashSet<String>> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .arg("ls-files")
        .arg("-z")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output();

    let output = match output {
        Ok(out) => out,
        Err(err) => bail!("--git-tracked-only requires git on PATH: {err}"),
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("--git-tracked-only requires a git repository at {}: {stderr}", root.display());
    }

    let mut files = HashSet::new();
    for part in output.stdout.split(|b| *b == 0) {
        if part.is_empty() {
            continue;
        }
        files.insert(String::from_utf8_lossy(part).replace('\\', "/"));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command as StdCommand;

    fn git_available() -> bool {
        StdCommand::new("git").arg("--version").output().is_ok()
    }

    #[test]
    fn non_repo_is_fatal() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        assert!(git_ls_files(dir.path()).is_err());
    }

    #[test]
    fn repo_lists_tracked_files() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let run = |args: &[&str]| {
            StdCommand::new("git").current_dir(dir.path()).args(args).output().unwrap()
        };
        run(&["init", "-q"]);
        run(&["config", "user.email", "a@b.c"]);
        run(&["config", "user.name", "tester"]);
        fs::write(dir.path().join("tracked.txt"), "x").unwrap();
        run(&["add", "tracked.txt"]);
        run(&["commit", "-q", "-m", "init"]);
        fs::write(dir.path().join("untracked.txt"), "y").unwrap();

        let files = git_ls_files(dir.path()).unwrap();
        assert!(files.contains("tracked.txt"));
        assert!(!files.contains("untracked.txt"));
    }
}
