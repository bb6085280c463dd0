//! Port pins for the ATmega4809
//!
//! Pins are addressed by port letter and bit so pins on different ports
//! share one type. Direction and level changes use the DIRSET/OUTSET/
//! OUTCLR strobe registers, so no read-modify-write is needed.

use avr_device::atmega4809::{PORTA, PORTB, PORTC, PORTD, PORTE, PORTF};
use nanotwi_hal::{OutputPin, PinDirection};

/// Port letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Run `$body` with `$regs` bound to the register block of `$port`
macro_rules! with_port {
    ($port:expr, |$regs:ident| $body:expr) => {
        // SAFETY: only the strobe registers and plain reads are used; each
        // access is a single atomic byte store or load.
        #[allow(unused_unsafe)]
        unsafe {
            match $port {
                Port::A => {
                    let $regs = &*PORTA::ptr();
                    $body
                }
                Port::B => {
                    let $regs = &*PORTB::ptr();
                    $body
                }
                Port::C => {
                    let $regs = &*PORTC::ptr();
                    $body
                }
                Port::D => {
                    let $regs = &*PORTD::ptr();
                    $body
                }
                Port::E => {
                    let $regs = &*PORTE::ptr();
                    $body
                }
                Port::F => {
                    let $regs = &*PORTF::ptr();
                    $body
                }
            }
        }
    };
}

/// A single port pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPin {
    port: Port,
    mask: u8,
}

impl PortPin {
    /// Pin `bit` (0-7) of `port`
    pub const fn new(port: Port, bit: u8) -> Self {
        Self {
            port,
            mask: 1 << (bit & 0x07),
        }
    }
}

impl OutputPin for PortPin {
    fn set_high(&mut self) {
        let mask = self.mask;
        with_port!(self.port, |regs| regs.outset.write(|w| w.bits(mask)));
    }

    fn set_low(&mut self) {
        let mask = self.mask;
        with_port!(self.port, |regs| regs.outclr.write(|w| w.bits(mask)));
    }

    fn toggle(&mut self) {
        let mask = self.mask;
        with_port!(self.port, |regs| regs.outtgl.write(|w| w.bits(mask)));
    }

    fn is_set_high(&self) -> bool {
        let mask = self.mask;
        with_port!(self.port, |regs| regs.out.read().bits() & mask != 0)
    }
}

impl PinDirection for PortPin {
    fn set_output(&mut self) {
        let mask = self.mask;
        with_port!(self.port, |regs| regs.dirset.write(|w| w.bits(mask)));
    }

    fn is_output(&self) -> bool {
        let mask = self.mask;
        with_port!(self.port, |regs| regs.dir.read().bits() & mask != 0)
    }
}
