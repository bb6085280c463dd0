//! Board-agnostic core logic for the nanotwi firmware
//!
//! This crate contains everything that does not depend on a specific
//! chip, written against the `nanotwi-hal` traits:
//!
//! - Baud divisor math and 7-bit address encoding
//! - Session state machine for the TWI host
//! - TWI host driver with a bounded ready wait
//! - Interrupt completion flag
//! - OLED boot sequence and its report
//! - Compile-time boot configuration

#![no_std]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

pub mod address;
pub mod baud;
pub mod completion;
pub mod config;
pub mod driver;
pub mod sequencer;
pub mod state;

pub use address::Address;
pub use config::BootConfig;
pub use driver::{TwiError, TwiHost, WaitMode};
pub use sequencer::{BootError, BootPins, BootReport, BootSequencer};
