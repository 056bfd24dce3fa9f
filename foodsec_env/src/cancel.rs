//! Cooperative cancellation shared between a caller and a running scenario.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation flag checked by the engine before each simulated year.
///
/// Clones share the same flag, so a caller keeps one clone and hands the
/// other to the run. Cancelling never interrupts a year in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the "not cancelled" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_flag() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!handle.is_cancelled());

        token.cancel();

        assert!(handle.is_cancelled());
    }
}
