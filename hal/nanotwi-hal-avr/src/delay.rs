//! Busy-wait delay
//!
//! The boot sequence only needs coarse millisecond delays, so a calibrated
//! spin loop is enough; no timer is claimed.

use embedded_hal::delay::DelayNs;

/// Approximate cycles spent per spin iteration (nop + counter + branch)
const CYCLES_PER_SPIN: u32 = 6;

/// Delay by spinning the CPU
#[derive(Debug, Clone, Copy)]
pub struct CycleDelay {
    /// Spin iterations per microsecond
    spins_per_us: u32,
}

impl CycleDelay {
    /// Delay calibrated for a CPU clock of `clock_hz`
    pub const fn new(clock_hz: u32) -> Self {
        let per_us = clock_hz / 1_000_000 / CYCLES_PER_SPIN;
        Self {
            spins_per_us: if per_us == 0 { 1 } else { per_us },
        }
    }

    #[inline(always)]
    fn spin(&self, iterations: u32) {
        for _ in 0..iterations {
            avr_device::asm::nop();
        }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        // Round up to whole microseconds
        self.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        for _ in 0..us {
            self.spin(self.spins_per_us);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}
