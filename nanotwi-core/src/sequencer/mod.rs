//! OLED boot sequence
//!
//! Brings up the display in one fixed pass:
//!
//! 1. Bus lines and debug LEDs become outputs
//! 2. Power-up delay
//! 3. Address latched, module initialized, START issued, interrupts enabled
//! 4. Abort unless the bus state is exactly OWNER
//! 5. Heartbeat blinks, then the init stream is written with two advisory
//!    checkpoints lighting the checkpoint LEDs
//! 6. Settle, STOP, settle, then a final check turns the checkpoint LEDs
//!    off when the bus is clean idle
//!
//! Only a missing bus ownership (or a write that never becomes ready)
//! ends the sequence early. Flag checks light LEDs and land in the
//! [`BootReport`]; they never change control flow.

pub mod commands;
pub mod report;

use embedded_hal::delay::DelayNs;
use nanotwi_hal::{BusState, OutputPin, PinDirection, Status, TwiRegisters};

use crate::config::BootConfig;
use crate::driver::{TwiError, TwiHost};

pub use commands::{INIT_STREAM, INIT_STREAM_LEN};
pub use report::{BootError, BootReport, Checkpoint};

/// Pins driven by the boot sequence
pub struct BootPins<B, L> {
    /// Bus data line
    pub sda: B,
    /// Bus clock line
    pub scl: B,
    /// Blinks once the bus is owned
    pub heartbeat: L,
    /// Lit when the control byte went out without error flags
    pub first_check: L,
    /// Lit when the first command went out without error flags
    pub second_check: L,
}

impl<B: PinDirection, L: OutputPin + PinDirection> BootPins<B, L> {
    fn configure(&mut self) {
        self.sda.set_output();
        self.scl.set_output();
        self.heartbeat.set_output();
        self.first_check.set_output();
        self.second_check.set_output();
    }
}

/// Boot sequencer
pub struct BootSequencer<R, B, L, D> {
    host: TwiHost<R>,
    pins: BootPins<B, L>,
    delay: D,
    config: BootConfig,
}

impl<R, B, L, D> BootSequencer<R, B, L, D>
where
    R: TwiRegisters,
    B: PinDirection,
    L: OutputPin + PinDirection,
    D: DelayNs,
{
    /// Create a sequencer over a fresh driver
    pub fn new(host: TwiHost<R>, pins: BootPins<B, L>, delay: D, config: BootConfig) -> Self {
        Self {
            host,
            pins,
            delay,
            config,
        }
    }

    /// Take the parts back
    pub fn into_parts(self) -> (TwiHost<R>, BootPins<B, L>, D) {
        (self.host, self.pins, self.delay)
    }

    /// Run the boot sequence once
    pub fn run(&mut self) -> Result<BootReport, BootError> {
        info!("Boot: bringing up display at {:#x}", self.config.address.get());

        self.pins.configure();
        self.delay.delay_ms(self.config.power_up_delay_ms);

        let divisor = self.config.divisor()?;
        self.host.set_address(self.config.address.write_byte())?;
        self.host.initialize(divisor)?;
        self.host.start()?;
        self.host.enable_interrupts();

        let status = self.host.status();
        if status.bus_state() != BusState::Owner {
            warn!(
                "Boot: bus not owned ({:?}), MSTATUS={:#x}",
                status.bus_state(),
                status.bits()
            );
            return Err(BootError::NotOwner(status));
        }
        debug!("Boot: bus owned");

        self.blink_heartbeat();

        let mut statuses = [Status::from_bits(0); INIT_STREAM_LEN];

        statuses[0] = self.write_at(0)?;
        let first = self.checkpoint(0);
        if first.clean() {
            self.pins.first_check.set_high();
        }

        statuses[1] = self.write_at(1)?;
        self.pins.heartbeat.set_low();
        let second = self.checkpoint(1);
        if second.clean() {
            self.pins.second_check.set_high();
        }

        for (index, slot) in statuses.iter_mut().enumerate().skip(2) {
            *slot = self.write_at(index)?;
        }

        // No completion signal for the last byte
        self.delay.delay_ms(self.config.settle_delay_ms);
        self.host.stop()?;
        self.delay.delay_ms(self.config.settle_delay_ms);

        let final_status = self.host.status();
        if final_status.is_clean_idle() {
            self.pins.first_check.set_low();
            self.pins.second_check.set_low();
            info!("Boot: display initialized");
        } else {
            warn!("Boot: bus not clean after STOP, MSTATUS={:#x}", final_status.bits());
        }

        Ok(BootReport {
            write_statuses: statuses,
            first,
            second,
            final_status,
        })
    }

    fn write_at(&mut self, index: usize) -> Result<Status, BootError> {
        self.host.write(INIT_STREAM[index]).map_err(|e| match e {
            TwiError::Timeout { .. } => BootError::Timeout { index },
            other => BootError::Sequence(other),
        })
    }

    fn blink_heartbeat(&mut self) {
        let half = self.config.blink_half_period_ms;
        for _ in 0..self.config.blink_count {
            self.delay.delay_ms(half);
            self.pins.heartbeat.set_high();
            self.delay.delay_ms(half);
            self.pins.heartbeat.set_low();
        }
    }

    fn checkpoint(&mut self, index: usize) -> Checkpoint {
        let status = self.host.status();
        if !status.is_error_free() {
            warn!(
                "Boot: error flags after byte {}: {:?}",
                index,
                status.error_flags()
            );
        }
        Checkpoint { index, status }
    }
}
