//! ATmega4809-specific HAL for nanotwi
//!
//! Implements the `nanotwi-hal` traits on the ATmega4809 as fitted to the
//! Arduino Nano Every:
//!
//! - [`twi::Twi0`] - TWI0 host register block
//! - [`gpio::PortPin`] - port pins by port and bit
//! - [`delay::CycleDelay`] - calibrated busy-wait delay
//! - [`clock`] - main clock prescaler setup
//! - [`serial::Usart3Tx`] - transmit-only USART3 on the USB bridge
//!
//! Register access goes through `avr-device`. Every type here assumes it
//! is the only user of its peripheral; the firmware hands each one out
//! exactly once.

#![no_std]

pub mod clock;
pub mod delay;
pub mod gpio;
pub mod serial;
pub mod twi;

pub use delay::CycleDelay;
pub use gpio::{Port, PortPin};
pub use serial::Usart3Tx;
pub use twi::Twi0;
