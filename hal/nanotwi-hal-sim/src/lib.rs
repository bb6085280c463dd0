//! Host-side HAL for nanotwi tests
//!
//! Implements the `nanotwi-hal` traits without hardware:
//!
//! - [`twi::SimTwi`] - behavioral model of the TWI host peripheral with a
//!   configurable peer on the bus
//! - [`gpio::MockPin`] - output pin that records its history
//! - [`delay::MockDelay`] - delay that records requested durations instead of
//!   sleeping

pub mod delay;
pub mod gpio;
pub mod twi;

pub use delay::MockDelay;
pub use gpio::MockPin;
pub use twi::{Access, Peer, Reg, SimTwi};
