//! Compile-time boot configuration
//!
//! Everything the boot sequence needs is fixed at build time. The firmware
//! generates its `BootConfig` from `board.toml`; host tests use
//! [`BootConfig::NANO_EVERY_OLED`] or tweak a copy of it.

use nanotwi_hal::I2cConfig;

use crate::address::Address;
use crate::baud::{self, BaudError};

/// Default poll budget for one byte
///
/// A byte plus ACK is 9 SCL periods (about 91 us at 98.8 kHz). One status
/// poll costs roughly 10 cycles at 16 MHz, so 50 000 polls is about 30 ms,
/// well past any legitimate transfer.
pub const DEFAULT_WRITE_TIMEOUT_POLLS: u32 = 50_000;

/// Boot sequence parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootConfig {
    /// CPU / peripheral clock in Hz
    pub host_clock_hz: u32,
    /// Target bus rate
    pub bus: I2cConfig,
    /// Display address (7-bit)
    pub address: Address,
    /// Status polls before a write gives up
    pub write_timeout_polls: u32,
    /// Wait for the display to power up before touching the bus
    pub power_up_delay_ms: u32,
    /// Wait after the last byte and after STOP
    pub settle_delay_ms: u32,
    /// Heartbeat blinks once the bus is owned
    pub blink_count: u8,
    /// Heartbeat on time and off time
    pub blink_half_period_ms: u32,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::NANO_EVERY_OLED
    }
}

impl BootConfig {
    /// Arduino Nano Every (16 MHz) with a 128x64 OLED at 0x3C
    pub const NANO_EVERY_OLED: Self = Self {
        host_clock_hz: 16_000_000,
        bus: I2cConfig::STANDARD,
        address: Address::SSD1306_PRIMARY,
        write_timeout_polls: DEFAULT_WRITE_TIMEOUT_POLLS,
        power_up_delay_ms: 20,
        settle_delay_ms: 25,
        blink_count: 5,
        blink_half_period_ms: 20,
    };

    /// MBAUD value for this configuration
    pub const fn divisor(&self) -> Result<u8, BaudError> {
        baud::divisor(self.host_clock_hz, self.bus.frequency)
    }

    /// Same configuration with a different display address
    pub const fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Same configuration with a different poll budget
    pub const fn with_write_timeout(mut self, polls: u32) -> Self {
        self.write_timeout_polls = polls;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_divisor() {
        assert_eq!(BootConfig::default().divisor(), Ok(76));
    }

    #[test]
    fn test_default_address() {
        assert_eq!(BootConfig::NANO_EVERY_OLED.address.write_byte(), 0x78);
    }

    #[test]
    fn test_builders() {
        let config = BootConfig::NANO_EVERY_OLED
            .with_address(Address::SSD1306_SECONDARY)
            .with_write_timeout(10);
        assert_eq!(config.address, Address::SSD1306_SECONDARY);
        assert_eq!(config.write_timeout_polls, 10);
        assert_eq!(config.host_clock_hz, 16_000_000);
    }
}
