//! TWI0 host register block

use avr_device::atmega4809::TWI0;
use nanotwi_hal::twi::mctrla;
use nanotwi_hal::TwiRegisters;

/// TWI0 host-side registers
pub struct Twi0 {
    twi: TWI0,
}

impl Twi0 {
    /// Take ownership of TWI0
    pub fn new(twi: TWI0) -> Self {
        Self { twi }
    }

    /// Clear WIEN from interrupt context
    ///
    /// The host interrupt is level-triggered on WIF; the handler masks it
    /// until the driver stages the next byte and re-arms.
    pub fn mask_write_interrupt() {
        // SAFETY: single read-modify-write of MCTRLA from the TWI0 ISR;
        // the main context only touches MCTRLA with the interrupt masked
        // or from the driver after staging MDATA.
        #[allow(unused_unsafe)]
        unsafe {
            let twi = &*TWI0::ptr();
            let value = twi.mctrla.read().bits();
            twi.mctrla.write(|w| w.bits(value & !mctrla::WIEN));
        }
    }
}

#[allow(unused_unsafe)]
impl TwiRegisters for Twi0 {
    fn write_baud(&mut self, divisor: u8) {
        self.twi.mbaud.write(|w| unsafe { w.bits(divisor) });
    }

    fn read_ctrl_a(&self) -> u8 {
        self.twi.mctrla.read().bits()
    }

    fn write_ctrl_a(&mut self, value: u8) {
        self.twi.mctrla.write(|w| unsafe { w.bits(value) });
    }

    fn read_ctrl_b(&self) -> u8 {
        self.twi.mctrlb.read().bits()
    }

    fn write_ctrl_b(&mut self, value: u8) {
        self.twi.mctrlb.write(|w| unsafe { w.bits(value) });
    }

    fn read_status(&mut self) -> u8 {
        self.twi.mstatus.read().bits()
    }

    fn write_status(&mut self, value: u8) {
        self.twi.mstatus.write(|w| unsafe { w.bits(value) });
    }

    fn read_addr(&self) -> u8 {
        self.twi.maddr.read().bits()
    }

    fn write_addr(&mut self, value: u8) {
        self.twi.maddr.write(|w| unsafe { w.bits(value) });
    }

    fn write_data(&mut self, value: u8) {
        self.twi.mdata.write(|w| unsafe { w.bits(value) });
    }
}
