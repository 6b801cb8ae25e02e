use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle
///
/// Cloning yields a second handle to the same flag, so one copy can be
/// kept by the thread running [cluster](crate::dbscan::Clusterer::cluster)
/// while another one cancels it. The flag is checked at least once per
/// scanned item and once per radius query.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, non-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the holder of this token to abort
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check whether [cancel](Self::cancel) was called on this token
    /// or one of its clones
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }
}
