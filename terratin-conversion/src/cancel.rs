//! Cooperative cancellation for racing conversions

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag polled by the conversion loops between iterations.
///
/// Cancellation is cooperative: the holder finishes its current step and
/// returns `Error::Cancelled` at the next check, so abandoned work unwinds
/// through normal drops.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the holder to stop at its next iteration check
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());

        let shared = flag.clone();
        shared.cancel();
        assert!(flag.is_cancelled());
    }
}
