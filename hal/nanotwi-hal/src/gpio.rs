//! GPIO pin abstractions
//!
//! Provides traits for digital output pins that can be implemented
//! by chip-specific HALs.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Pin whose direction is switched at runtime
///
/// On the AVR every port pin powers up as an input; the boot sequence
/// turns the bus lines and debug LEDs into outputs before use.
pub trait PinDirection {
    /// Make the pin an output
    fn set_output(&mut self);

    /// Check if the pin is currently an output
    fn is_output(&self) -> bool;
}
