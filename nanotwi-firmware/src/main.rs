//! nanotwi firmware for the Arduino Nano Every
//!
//! Brings up TWI0 and sends the SSD1306 initialization stream once, with
//! three debug LEDs tracking progress.
//!
//! Pin mapping:
//! - PA2 (A4) SDA, PA3 (A5) SCL
//! - PE2 (D13, on-board LED) heartbeat
//! - PE3 (D8) first checkpoint
//! - PA1 (D7) second checkpoint

#![no_std]
#![no_main]

mod logger;

use avr_device::atmega4809::Peripherals;
use log::LevelFilter;
use nanotwi_core::address::Address;
use nanotwi_core::completion::WriteCompletion;
use nanotwi_core::{BootConfig, BootError, BootPins, BootSequencer, TwiHost};
use nanotwi_hal::I2cConfig;
use nanotwi_hal_avr::{clock, CycleDelay, Port, PortPin, Twi0, Usart3Tx};
use panic_halt as _;

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// Set by the TWI0 host interrupt when a byte has been shifted out
static WRITE_COMPLETE: WriteCompletion = WriteCompletion::new();

#[avr_device::entry]
fn main() -> ! {
    let Some(dp) = Peripherals::take() else {
        halt();
    };

    clock::disable_prescaler(&dp.CPU, &dp.CLKCTRL);

    let serial = Usart3Tx::new(
        dp.USART3,
        &dp.PORTMUX,
        &dp.PORTB,
        BOOT_CONFIG.host_clock_hz,
        SERIAL_BAUD,
    );
    logger::init(serial, LevelFilter::Info);

    log::info!(
        "nanotwi: display {} at {} Hz, divisor {:?}",
        BOOT_CONFIG.address,
        BOOT_CONFIG.bus.frequency,
        BOOT_CONFIG.divisor()
    );

    let twi = Twi0::new(dp.TWI0);
    let host = if INTERRUPT_DRIVEN {
        let host = TwiHost::with_completion(twi, BOOT_CONFIG.write_timeout_polls, &WRITE_COMPLETE);
        // SAFETY: all shared state (the completion flag and the logger) is
        // initialized at this point.
        unsafe { avr_device::interrupt::enable() };
        host
    } else {
        TwiHost::new(twi, BOOT_CONFIG.write_timeout_polls)
    };

    let pins = BootPins {
        sda: PortPin::new(Port::A, 2),
        scl: PortPin::new(Port::A, 3),
        heartbeat: PortPin::new(Port::E, 2),
        first_check: PortPin::new(Port::E, 3),
        second_check: PortPin::new(Port::A, 1),
    };

    let mut sequencer = BootSequencer::new(
        host,
        pins,
        CycleDelay::new(BOOT_CONFIG.host_clock_hz),
        BOOT_CONFIG,
    );

    match sequencer.run() {
        Ok(report) => log::info!(
            "boot: {} bytes, final status {:#04x}, clean {}",
            report.bytes_written(),
            report.final_status.bits(),
            report.finished_clean()
        ),
        Err(BootError::NotOwner(status)) => {
            log::error!("boot: bus not owned after START ({:#04x})", status.bits())
        }
        Err(e) => log::error!("boot: {}", e),
    }

    halt()
}

fn halt() -> ! {
    loop {
        avr_device::asm::nop();
    }
}

/// TWI0 host interrupt: fires while WIF is set and WIEN is enabled
#[avr_device::interrupt(atmega4809)]
fn TWI0_TWIM() {
    WRITE_COMPLETE.signal();
    Twi0::mask_write_interrupt();
}
