//! Recording delay

use embedded_hal::delay::DelayNs;

/// Delay provider that records every request and returns immediately
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    elapsed_ns: u64,
    /// Millisecond delays in request order
    ms_calls: Vec<u32>,
}

impl MockDelay {
    /// Create a delay with nothing recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time requested, in nanoseconds
    pub fn elapsed_ns(&self) -> u64 {
        self.elapsed_ns
    }

    /// Total time requested, in whole milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }

    /// Every `delay_ms` request in order
    pub fn ms_calls(&self) -> &[u32] {
        &self.ms_calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.push(ms);
        self.elapsed_ns += u64::from(ms) * 1_000_000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_requests() {
        let mut delay = MockDelay::new();
        delay.delay_ms(20);
        delay.delay_us(500);
        delay.delay_ms(25);

        assert_eq!(delay.ms_calls(), &[20, 25]);
        assert_eq!(delay.elapsed_ns(), 45_500_000);
        assert_eq!(delay.elapsed_ms(), 45);
    }
}
