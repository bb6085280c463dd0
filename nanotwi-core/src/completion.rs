//! Write-completion flag shared with the TWI interrupt
//!
//! The host interrupt fires when WIF rises with WIEN set. The handler calls
//! [`WriteCompletion::signal`] and masks WIEN; a driver in
//! [`WaitMode::Interrupt`](crate::driver::WaitMode) takes the flag instead
//! of polling MSTATUS and re-arms WIEN after staging the next byte.

use portable_atomic::{AtomicBool, Ordering};

/// One-shot "ready for the next byte" flag
#[derive(Debug)]
pub struct WriteCompletion {
    ready: AtomicBool,
}

impl Default for WriteCompletion {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteCompletion {
    /// Create a cleared flag
    pub const fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
        }
    }

    /// Mark the data register ready (interrupt context)
    pub fn signal(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Consume the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.ready.swap(false, Ordering::AcqRel)
    }

    /// Check the flag without consuming it
    pub fn is_signaled(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Clear the flag
    pub fn reset(&self) {
        self.ready.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_signal() {
        let flag = WriteCompletion::new();
        assert!(!flag.take());

        flag.signal();
        assert!(flag.is_signaled());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_reset() {
        let flag = WriteCompletion::new();
        flag.signal();
        flag.reset();
        assert!(!flag.is_signaled());
    }
}
