//! 7-bit peer addresses
//!
//! The TWI host takes the address pre-shifted into the upper seven bits of
//! MADDR with the direction in bit 0, so 0x3C goes on the wire as 0x78.

use core::fmt;

use nanotwi_hal::twi::ADDR_READ;

/// Error from address construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressError {
    /// Value does not fit in seven bits
    OutOfRange(u8),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::OutOfRange(raw) => write!(f, "address {:#04x} exceeds 7 bits", raw),
        }
    }
}

/// A 7-bit bus address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(u8);

impl Address {
    /// SSD1306 / SH1106 OLED with SA0 low
    pub const SSD1306_PRIMARY: Self = Self(0x3C);

    /// SSD1306 / SH1106 OLED with SA0 high
    pub const SSD1306_SECONDARY: Self = Self(0x3D);

    /// Create an address from its 7-bit value
    pub const fn new(raw: u8) -> Result<Self, AddressError> {
        if raw > 0x7F {
            Err(AddressError::OutOfRange(raw))
        } else {
            Ok(Self(raw))
        }
    }

    /// Recover the address from an 8-bit MADDR value (direction bit ignored)
    pub const fn from_wire(byte: u8) -> Self {
        Self(byte >> 1)
    }

    /// The 7-bit value
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// 8-bit form with the direction bit cleared (write)
    pub const fn write_byte(&self) -> u8 {
        self.0 << 1
    }

    /// 8-bit form with the direction bit set (read)
    pub const fn read_byte(&self) -> u8 {
        (self.0 << 1) | ADDR_READ
    }
}

impl TryFrom<u8> for Address {
    type Error = AddressError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_oled_address_on_wire() {
        assert_eq!(Address::SSD1306_PRIMARY.write_byte(), 0x78);
        assert_eq!(Address::SSD1306_PRIMARY.read_byte(), 0x79);
        assert_eq!(Address::SSD1306_SECONDARY.write_byte(), 0x7A);
    }

    #[test]
    fn test_rejects_eight_bit_values() {
        assert_eq!(Address::new(0x80), Err(AddressError::OutOfRange(0x80)));
        assert_eq!(Address::try_from(0x78), Ok(Address(0x78)));
        assert!(Address::new(0xFF).is_err());
    }

    #[test]
    fn test_from_wire_drops_direction() {
        assert_eq!(Address::from_wire(0x78), Address::SSD1306_PRIMARY);
        assert_eq!(Address::from_wire(0x79), Address::SSD1306_PRIMARY);
    }

    proptest! {
        #[test]
        fn prop_write_byte_has_direction_clear(raw in 0u8..=0x7F) {
            let addr = Address::new(raw).unwrap();
            prop_assert_eq!(addr.write_byte() & ADDR_READ, 0);
            prop_assert_eq!(Address::from_wire(addr.write_byte()), addr);
        }
    }
}
