//! Transmit-only USART3
//!
//! On the Nano Every, USART3 on its alternate pins (PB4 TX, PB5 RX) is
//! wired to the USB bridge. Only TX is brought up; it carries log output.

use avr_device::atmega4809::{PORTB, PORTMUX, USART3};

/// USART3 route bits in PORTMUX.USARTROUTEA (ALT1: PB4/PB5)
const USART3_ROUTE_ALT1: u8 = 0x40;
const USART3_ROUTE_MASK: u8 = 0xC0;

/// PB4
const TX_PIN_MASK: u8 = 1 << 4;

/// CTRLB.TXEN
const TXEN: u8 = 0x40;

/// STATUS.DREIF
const DREIF: u8 = 0x20;

/// BAUD register value for normal-speed asynchronous mode
pub const fn baud_register(clock_hz: u32, baud: u32) -> u16 {
    // BAUD = 64 * f / (16 * rate), rounded to nearest
    ((4 * clock_hz as u64 + baud as u64 / 2) / baud as u64) as u16
}

/// USART3 transmitter
pub struct Usart3Tx {
    usart: USART3,
}

impl Usart3Tx {
    /// Route USART3 to PB4, set the rate and enable the transmitter
    pub fn new(usart: USART3, portmux: &PORTMUX, portb: &PORTB, clock_hz: u32, baud: u32) -> Self {
        #[allow(unused_unsafe)]
        unsafe {
            let route = portmux.usartroutea.read().bits();
            portmux
                .usartroutea
                .write(|w| w.bits((route & !USART3_ROUTE_MASK) | USART3_ROUTE_ALT1));
            portb.dirset.write(|w| w.bits(TX_PIN_MASK));
            usart.baud.write(|w| w.bits(baud_register(clock_hz, baud)));
            usart.ctrlb.write(|w| w.bits(TXEN));
        }
        Self { usart }
    }

    /// Block until the data register is free, then send `byte`
    pub fn write_byte(&mut self, byte: u8) {
        while self.usart.status.read().bits() & DREIF == 0 {}
        #[allow(unused_unsafe)]
        self.usart.txdatal.write(|w| unsafe { w.bits(byte) });
    }
}

impl core::fmt::Write for Usart3Tx {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}
