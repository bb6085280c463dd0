//! Main clock setup
//!
//! The ATmega4809 comes out of reset with the main clock prescaler at /6.
//! The Nano Every fuses select the 16 MHz internal oscillator, so clearing
//! the prescaler gives the 16 MHz host clock the baud divisor assumes.

use avr_device::atmega4809::{CLKCTRL, CPU};

/// CCP signature unlocking protected I/O registers for four cycles
const CCP_IOREG: u8 = 0xD8;

/// Run the CPU at the undivided oscillator frequency
pub fn disable_prescaler(cpu: &CPU, clkctrl: &CLKCTRL) {
    // SAFETY: the CCP unlock must be followed by the protected write within
    // four instructions; both stores are plain byte writes.
    #[allow(unused_unsafe)]
    unsafe {
        cpu.ccp.write(|w| w.bits(CCP_IOREG));
        clkctrl.mclkctrlb.write(|w| w.bits(0));
    }
}
