//! TWI host baud divisor
//!
//! The host clock generator produces
//!
//! ```text
//! f_SCL = f_host / (10 + 2 * BAUD)
//! ```
//!
//! ignoring rise time. [`divisor`] picks the smallest BAUD whose SCL rate
//! is strictly below the requested rate. Rise time only slows the bus
//! further, so the result never overclocks the peer.

use core::fmt;

/// Error from divisor computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudError {
    /// Requested bus rate of zero
    ZeroBusRate,
    /// Divisor does not fit in the 8-bit MBAUD register
    OutOfRange(u32),
}

impl fmt::Display for BaudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaudError::ZeroBusRate => write!(f, "bus rate must be non-zero"),
            BaudError::OutOfRange(d) => write!(f, "divisor {} does not fit MBAUD", d),
        }
    }
}

/// Compute the MBAUD value for `host_hz` and a target of `bus_hz`
///
/// 16 MHz / 100 kHz gives 76 (98.8 kHz on the wire).
pub const fn divisor(host_hz: u32, bus_hz: u32) -> Result<u8, BaudError> {
    if bus_hz == 0 {
        return Err(BaudError::ZeroBusRate);
    }

    let host = host_hz as u64;
    let bus = bus_hz as u64;
    let fixed = 10 * bus;

    // Smallest BAUD with host / (10 + 2 * BAUD) < bus
    let baud = if host < fixed {
        0
    } else {
        (host - fixed) / (2 * bus) + 1
    };

    if baud > u8::MAX as u64 {
        Err(BaudError::OutOfRange(baud as u32))
    } else {
        Ok(baud as u8)
    }
}

/// SCL rate produced by `divisor` at `host_hz`
pub const fn bus_frequency(host_hz: u32, divisor: u8) -> u32 {
    host_hz / (10 + 2 * divisor as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanotwi_hal::I2cConfig;
    use proptest::prelude::*;

    #[test]
    fn test_nano_every_standard_mode() {
        assert_eq!(divisor(16_000_000, 100_000), Ok(76));
        assert_eq!(bus_frequency(16_000_000, 76), 98_765);
    }

    #[test]
    fn test_fast_mode() {
        let fast = I2cConfig::FAST.frequency;
        assert_eq!(divisor(16_000_000, fast), Ok(16));
        assert!(bus_frequency(16_000_000, 16) < fast);
    }

    #[test]
    fn test_zero_bus_rate() {
        assert_eq!(divisor(16_000_000, 0), Err(BaudError::ZeroBusRate));
    }

    #[test]
    fn test_divisor_overflow() {
        assert!(matches!(
            divisor(20_000_000, 10_000),
            Err(BaudError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_bus_faster_than_host_allows() {
        // 8 MHz cannot reach 1 MHz; the fastest setting is used
        assert_eq!(divisor(8_000_000, I2cConfig::FAST_PLUS.frequency), Ok(0));
    }

    proptest! {
        #[test]
        fn prop_divisor_is_tightest_below_target(
            host in 8_000_000u32..=20_000_000,
            bus in 40_000u32..=1_000_000,
        ) {
            let d = divisor(host, bus).unwrap();
            prop_assert!(bus_frequency(host, d) < bus || d == 0);
            if d > 0 {
                prop_assert!(bus_frequency(host, d - 1) >= bus);
            }
        }
    }
}
