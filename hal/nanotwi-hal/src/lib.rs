//! nanotwi Hardware Abstraction Layer
//!
//! This crate defines the traits the board-agnostic driver and boot
//! sequence are written against, plus the bit-level contract of the
//! TWI host peripheral. Chip crates implement the traits on real
//! registers; the simulator crate implements them for host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  nanotwi-firmware / nanotwi-core         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  nanotwi-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  nanotwi-hal- │       │  nanotwi-hal- │
//! │      avr      │       │      sim      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`twi::TwiRegisters`] - TWI host register block
//! - [`gpio::OutputPin`], [`gpio::PinDirection`] - Digital output
//!
//! Delays use `embedded_hal::delay::DelayNs` directly.

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod twi;

// Re-export key traits at crate root for convenience
pub use gpio::{OutputPin, PinDirection};
pub use i2c::I2cConfig;
pub use twi::{BusState, Status, TwiRegisters};
