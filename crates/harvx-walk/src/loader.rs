use harvx_types::FileDescriptor;
use rayon::prelude::*;

use crate::cancel::CancellationToken;

/// Runs `process` over every descriptor in `files` through a bounded
/// `rayon` thread pool sized to `parallelism` (0 defaults to the
/// available hardware thread count, per spec.md §4.3 step 5). `process`
/// is expected to read the file's content and run redaction,
/// tokenization, and compression on it, per spec.md §5's "tokenization
/// and redaction are invoked within the worker function" concurrency
/// note — the pipeline orchestrator supplies that closure since it is
/// the only stage that knows about every downstream component.
///
/// A descriptor whose checkpoint observes `cancel` already signalled is
/// left untouched (its content stays empty, `error` unset) rather than
/// aborting the whole pool, so already-started work still completes
/// within the latency bound spec.md §5 asks for.
pub fn load_parallel<F>(
    mut files: Vec<FileDescriptor>,
    parallelism: usize,
    cancel: &CancellationToken,
    process: F,
) -> Vec<FileDescriptor>
where
    F: Fn(&mut FileDescriptor) + Sync,
{
    let threads = if parallelism == 0 {
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    } else {
        parallelism
    };

    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build();
    let run = |files: &mut Vec<FileDescriptor>| {
        files.par_iter_mut().for_each(|fd| {
            if cancel.is_cancelled() {
                return;
            }
            process(fd);
        });
    };

    match pool {
        Ok(pool) => pool.install(|| run(&mut files)),
        Err(_) => run(&mut files),
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fd(path: &str) -> FileDescriptor {
        FileDescriptor::new(path.to_string(), PathBuf::from(path), 0)
    }

    #[test]
    fn processes_every_file() {
        let files = vec![fd("a"), fd("b"), fd("c")];
        let cancel = CancellationToken::new();
        let out = load_parallel(files, 2, &cancel, |fd| {
            fd.content = format!("loaded:{}", fd.path);
        });
        assert!(out.iter().all(|f| f.content.starts_with("loaded:")));
    }

    #[test]
    fn cancellation_leaves_untouched_descriptors() {
        let files = vec![fd("a"), fd("b")];
        let cancel = CancellationToken::new();
        cancel.cancel();
        let out = load_parallel(files, 1, &cancel, |fd| {
            fd.content = "should-not-run".to_string();
        });
        assert!(out.iter().all(|f| f.content.is_empty()));
    }

    #[test]
    fn zero_parallelism_uses_hardware_default() {
        let files = vec![fd("a")];
        let cancel = CancellationToken::new();
        let out = load_parallel(files, 0, &cancel, |fd| {
            fd.content = "x".to_string();
        });
        assert_eq!(out[0].content, "x");
    }
}
