//! Mock GPIO pin

use nanotwi_hal::{OutputPin, PinDirection};

/// Output pin that remembers how it was driven
#[derive(Debug, Clone, Default)]
pub struct MockPin {
    high: bool,
    output: bool,
    /// Number of low-to-high transitions
    rising_edges: u32,
    /// Writes attempted while the pin was still an input
    writes_as_input: u32,
}

impl MockPin {
    /// Create a pin in its reset state (input, low)
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of low-to-high transitions seen so far
    pub fn rising_edges(&self) -> u32 {
        self.rising_edges
    }

    /// Number of level changes requested before the pin became an output
    pub fn writes_as_input(&self) -> u32 {
        self.writes_as_input
    }

    fn drive(&mut self, high: bool) {
        if !self.output {
            self.writes_as_input += 1;
        }
        if high && !self.high {
            self.rising_edges += 1;
        }
        self.high = high;
    }
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.drive(true);
    }

    fn set_low(&mut self) {
        self.drive(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

impl PinDirection for MockPin {
    fn set_output(&mut self) {
        self.output = true;
    }

    fn is_output(&self) -> bool {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_rising_edges() {
        let mut pin = MockPin::new();
        pin.set_output();

        pin.set_high();
        pin.set_high();
        pin.set_low();
        pin.toggle();

        assert!(pin.is_set_high());
        assert_eq!(pin.rising_edges(), 2);
        assert_eq!(pin.writes_as_input(), 0);
    }

    #[test]
    fn test_tracks_writes_before_output() {
        let mut pin = MockPin::new();
        pin.set_high();
        assert_eq!(pin.writes_as_input(), 1);
        assert!(!pin.is_output());
    }
}
