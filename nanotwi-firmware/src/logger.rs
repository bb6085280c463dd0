//! `log` backend over USART3
//!
//! Records are written synchronously with interrupts masked, one line per
//! record. Output before [`init`] is dropped.

use core::cell::RefCell;
use core::fmt::Write;

use avr_device::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record};
use nanotwi_hal_avr::Usart3Tx;

static SERIAL: Mutex<RefCell<Option<Usart3Tx>>> = Mutex::new(RefCell::new(None));

static LOGGER: SerialLogger = SerialLogger;

struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(tx) = SERIAL.borrow(cs).borrow_mut().as_mut() {
                // Write errors are infallible on a polled UART
                let _ = writeln!(tx, "[{}] {}", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {}
}

/// Install the serial logger at `level`
pub fn init(tx: Usart3Tx, level: LevelFilter) {
    interrupt::free(|cs| {
        SERIAL.borrow(cs).replace(Some(tx));
    });

    // SAFETY: called once from `main` before interrupts are enabled, so no
    // other thread of execution can observe the logger being set.
    if unsafe { log::set_logger_racy(&LOGGER) }.is_ok() {
        log::set_max_level(level);
    }
}
