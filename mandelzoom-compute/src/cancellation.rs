use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Trait for checking if computation should be cancelled
pub trait CancellationChecker: Clone {
    /// Returns true if computation should be cancelled
    fn is_cancelled(&self) -> bool;
}

/// Never cancels - for single-threaded or non-cancellable contexts
#[derive(Clone, Copy, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Checks an atomic boolean flag for cancellation
#[derive(Clone)]
pub struct AtomicBoolChecker {
    flag: Arc<AtomicBool>,
}

impl AtomicBoolChecker {
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

impl CancellationChecker for AtomicBoolChecker {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Requests cancellation of a running render from another thread.
///
/// Cloned out of a [`RenderSession`](crate::RenderSession); the session
/// polls the same flag once per scanline.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub(crate) fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_cancel_always_returns_false() {
        let checker = NeverCancel;
        assert!(!checker.is_cancelled());
        assert!(!checker.is_cancelled());
    }

    #[test]
    fn test_atomic_bool_checker_reads_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let checker = AtomicBoolChecker::new(Arc::clone(&flag));

        assert!(!checker.is_cancelled());

        flag.store(true, Ordering::Relaxed);
        assert!(checker.is_cancelled());

        flag.store(false, Ordering::Relaxed);
        assert!(!checker.is_cancelled());
    }

    #[test]
    fn test_cancel_handle_sets_shared_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let handle = CancelHandle::new(Arc::clone(&flag));
        let checker = AtomicBoolChecker::new(flag);

        let remote = handle.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();

        assert!(handle.is_cancelled());
        assert!(checker.is_cancelled());
    }
}
