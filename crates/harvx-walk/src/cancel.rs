use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply-cloneable cooperative cancellation signal shared by every
/// blocking pipeline stage. Cancelling causes the walker to return
/// `SkipAll` for remaining entries, in-flight loader workers to abort at
/// their next checkpoint, the renderer to stop between file entries, and
/// the writer to delete its temp file without renaming (spec.md §5).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
