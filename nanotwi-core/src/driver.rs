//! TWI host driver
//!
//! Owned handle over a [`TwiRegisters`] block exposing the bring-up
//! operations: set address, initialize, start, write, stop and interrupt
//! enable. Nothing else touches the registers while the handle exists.
//!
//! Every operation is checked against the [`Session`] state machine first;
//! a rejected command returns [`TwiError::Sequence`] without touching a
//! register.
//!
//! # Ready wait
//!
//! [`TwiHost::write`] waits for the previous byte (or the address phase) to
//! finish before staging the next one. The wait is bounded by a poll
//! budget: if WIF never rises (no peer driving ACK, clock held low,
//! arbitration lost to a stuck host) the call returns
//! [`TwiError::Timeout`] instead of hanging.

use core::fmt;

use nanotwi_hal::twi::{mctrla, mctrlb, mstatus, ADDR_READ};
use nanotwi_hal::{Status, TwiRegisters};

use crate::completion::WriteCompletion;
use crate::state::{Command, Session};

/// Errors from driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwiError {
    /// Command not allowed in the current session state
    Sequence { state: Session, command: Command },
    /// Data register never became ready
    Timeout { polls: u32 },
}

impl fmt::Display for TwiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TwiError::Sequence { state, command } => {
                write!(f, "{:?} not allowed in state {:?}", command, state)
            }
            TwiError::Timeout { polls } => write!(f, "write not ready after {} polls", polls),
        }
    }
}

/// How [`TwiHost::write`] learns the data register is free
#[derive(Debug, Clone, Copy)]
pub enum WaitMode {
    /// Poll WIF in MSTATUS
    Poll,
    /// Consume a flag set by the TWI host interrupt
    Interrupt(&'static WriteCompletion),
}

/// TWI host driver
pub struct TwiHost<R> {
    regs: R,
    session: Session,
    wait: WaitMode,
    /// Polls allowed per ready wait (at least one)
    timeout_polls: u32,
}

impl<R: TwiRegisters> TwiHost<R> {
    /// Create a polling driver
    pub fn new(regs: R, timeout_polls: u32) -> Self {
        Self {
            regs,
            session: Session::Uninitialized,
            wait: WaitMode::Poll,
            timeout_polls: timeout_polls.max(1),
        }
    }

    /// Create a driver that waits on the interrupt completion flag
    pub fn with_completion(
        regs: R,
        timeout_polls: u32,
        completion: &'static WriteCompletion,
    ) -> Self {
        completion.reset();
        Self {
            wait: WaitMode::Interrupt(completion),
            ..Self::new(regs, timeout_polls)
        }
    }

    /// Current session state
    pub fn session(&self) -> Session {
        self.session
    }

    /// Read-only view of the register block
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Give the register block back
    pub fn release(self) -> R {
        self.regs
    }

    /// Read and decode MSTATUS
    pub fn status(&mut self) -> Status {
        Status::from_bits(self.regs.read_status())
    }

    fn advance(&mut self, command: Command) -> Result<(), TwiError> {
        match self.session.transition(command) {
            Some(next) => {
                self.session = next;
                Ok(())
            }
            None => {
                warn!("TWI: {:?} rejected in {:?}", command, self.session);
                Err(TwiError::Sequence {
                    state: self.session,
                    command,
                })
            }
        }
    }

    /// Disable the module and latch the 8-bit target address
    ///
    /// `addr` is the pre-shifted form (0x78 for a 0x3C peer); it is not
    /// validated. Because the module is disabled first, the write does not
    /// issue START.
    pub fn set_address(&mut self, addr: u8) -> Result<(), TwiError> {
        self.advance(Command::SetAddress)?;

        let ctrl_a = self.regs.read_ctrl_a();
        self.regs.write_ctrl_a(ctrl_a & !mctrla::ENABLE);
        self.regs.write_addr(addr);

        debug!("TWI: address {:#x} latched", addr);
        Ok(())
    }

    /// Program the baud divisor, force the bus idle and enable the module
    ///
    /// Must follow [`set_address`](Self::set_address).
    pub fn initialize(&mut self, divisor: u8) -> Result<(), TwiError> {
        self.advance(Command::Initialize)?;

        self.regs.write_baud(divisor);
        self.regs.write_status(mstatus::FORCE_IDLE);
        let ctrl_a = self.regs.read_ctrl_a();
        self.regs.write_ctrl_a(ctrl_a | mctrla::ENABLE);

        debug!("TWI: enabled, MBAUD={}", divisor);
        Ok(())
    }

    /// Issue START by rewriting the latched address with the write direction
    pub fn start(&mut self) -> Result<(), TwiError> {
        self.advance(Command::Start)?;

        let addr = self.regs.read_addr();
        self.regs.write_addr(addr & !ADDR_READ);

        trace!("TWI: START to {:#x}", addr & !ADDR_READ);
        Ok(())
    }

    /// Enable the read and write interrupts
    ///
    /// Allowed in every session state and leaves it unchanged.
    pub fn enable_interrupts(&mut self) {
        let ctrl_a = self.regs.read_ctrl_a();
        self.regs.write_ctrl_a(ctrl_a | mctrla::WIEN | mctrla::RIEN);
    }

    /// Wait for the data register, then stage `byte` for transmission
    ///
    /// Returns the status observed when the register became ready, which
    /// carries the ACK outcome of the previous byte (or of the address).
    /// The ACK of `byte` itself is only visible on the next call or via
    /// [`status`](Self::status).
    pub fn write(&mut self, byte: u8) -> Result<Status, TwiError> {
        self.advance(Command::Write)?;

        let status = self.wait_ready()?;
        self.regs.write_data(byte);

        if let WaitMode::Interrupt(_) = self.wait {
            // The handler masked WIEN; writing MDATA cleared WIF
            let ctrl_a = self.regs.read_ctrl_a();
            self.regs.write_ctrl_a(ctrl_a | mctrla::WIEN);
        }

        trace!("TWI: wrote {:#x}", byte);
        Ok(status)
    }

    fn wait_ready(&mut self) -> Result<Status, TwiError> {
        let wait = self.wait;
        for _ in 0..self.timeout_polls {
            let ready = match wait {
                WaitMode::Poll => {
                    let status = self.status();
                    status.write_ready().then_some(status)
                }
                WaitMode::Interrupt(completion) => {
                    completion.take().then(|| self.status())
                }
            };

            if let Some(status) = ready {
                return Ok(status);
            }
            core::hint::spin_loop();
        }

        let status = self.status();
        error!(
            "TWI: not ready after {} polls, MSTATUS={:#x}",
            self.timeout_polls,
            status.bits()
        );
        Err(TwiError::Timeout {
            polls: self.timeout_polls,
        })
    }

    /// Send NACK and STOP, releasing the bus
    ///
    /// Does not wait for the STOP to complete. On an idle bus the command
    /// has no effect.
    pub fn stop(&mut self) -> Result<(), TwiError> {
        self.advance(Command::Stop)?;

        let ctrl_b = self.regs.read_ctrl_b();
        self.regs
            .write_ctrl_b(ctrl_b | mctrlb::ACKACT_NACK | mctrlb::MCMD_STOP);

        trace!("TWI: STOP");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanotwi_hal::BusState;
    use nanotwi_hal_sim::{Access, Peer, Reg, SimTwi};

    const OLED: u8 = 0x78;

    fn host_with_peer() -> TwiHost<SimTwi> {
        TwiHost::new(SimTwi::new().with_peer(Peer::new(OLED)), 100)
    }

    fn owned(host: &mut TwiHost<SimTwi>) {
        host.set_address(OLED).unwrap();
        host.initialize(76).unwrap();
        host.start().unwrap();
    }

    #[test]
    fn test_initialize_before_address_is_rejected() {
        let mut host = host_with_peer();

        let err = host.initialize(76).unwrap_err();
        assert_eq!(
            err,
            TwiError::Sequence {
                state: Session::Uninitialized,
                command: Command::Initialize,
            }
        );

        // No register was touched; MADDR keeps its reset value
        let sim = host.release();
        assert!(sim.trace().is_empty());
        assert_eq!(sim.addr(), 0x00);
        assert_eq!(sim.baud(), 0);
    }

    #[test]
    fn test_address_latched_while_disabled() {
        let mut host = host_with_peer();
        host.set_address(OLED).unwrap();
        host.initialize(76).unwrap();

        let sim = host.release();
        let trace = sim.trace();
        // ENABLE cleared, then MADDR, then baud/status, then ENABLE set
        assert_eq!(trace[0], Access { reg: Reg::CtrlA, value: 0x00 });
        assert_eq!(trace[1], Access { reg: Reg::Addr, value: OLED });
        assert_eq!(trace[2], Access { reg: Reg::Baud, value: 76 });
        assert_eq!(trace[3], Access { reg: Reg::Status, value: 0xED });
        assert_eq!(trace[4].reg, Reg::CtrlA);
        assert_eq!(trace[4].value & mctrla::ENABLE, mctrla::ENABLE);
        // Latching the address did not start a transaction
        assert_eq!(sim.starts(), 0);
    }

    #[test]
    fn test_initialize_forces_idle() {
        let mut host = host_with_peer();
        host.set_address(OLED).unwrap();
        host.initialize(76).unwrap();

        assert_eq!(host.status().bus_state(), BusState::Idle);
        assert_eq!(host.session(), Session::Enabled);
        assert_eq!(host.registers().baud(), 76);
    }

    #[test]
    fn test_start_takes_ownership() {
        let mut host = host_with_peer();
        owned(&mut host);

        let status = host.status();
        assert_eq!(status.bus_state(), BusState::Owner);
        assert!(status.is_error_free());
        assert_eq!(host.registers().starts(), 1);
    }

    #[test]
    fn test_start_clears_direction_bit() {
        let mut host = host_with_peer();
        host.set_address(OLED | ADDR_READ).unwrap();
        host.initialize(76).unwrap();
        host.start().unwrap();

        assert_eq!(host.registers().addr(), OLED);
    }

    #[test]
    fn test_write_transmits_bytes_in_order() {
        let mut host = host_with_peer();
        owned(&mut host);

        for byte in [0x00, 0xAE, 0xAF] {
            host.write(byte).unwrap();
        }

        assert_eq!(host.registers().transmitted(), &[0x00, 0xAE, 0xAF]);
    }

    #[test]
    fn test_write_returns_previous_ack() {
        let sim = SimTwi::new().with_peer(Peer::new(OLED).with_nack_at(0));
        let mut host = TwiHost::new(sim, 100);
        owned(&mut host);

        // Address was ACKed
        assert!(host.write(0x00).unwrap().is_error_free());
        // Byte 0 was NACKed; staging continues regardless
        assert!(host.write(0xA8).unwrap().error_flags().nack);
        assert_eq!(host.registers().transmitted(), &[0x00, 0xA8]);
    }

    #[test]
    fn test_write_waits_through_latency() {
        let sim = SimTwi::new().with_peer(Peer::new(OLED)).with_latency(20);
        let mut host = TwiHost::new(sim, 100);
        owned(&mut host);

        host.write(0x00).unwrap();
        host.write(0xA8).unwrap();
        assert_eq!(host.registers().transmitted(), &[0x00, 0xA8]);
    }

    #[test]
    fn test_write_times_out_when_wif_never_rises() {
        let sim = SimTwi::new().with_peer(Peer::new(OLED)).stalled();
        let mut host = TwiHost::new(sim, 64);
        owned(&mut host);

        assert_eq!(host.write(0x00), Err(TwiError::Timeout { polls: 64 }));
        assert!(host.registers().transmitted().is_empty());
    }

    #[test]
    fn test_write_latency_beyond_budget_times_out() {
        let sim = SimTwi::new().with_peer(Peer::new(OLED)).with_latency(50);
        let mut host = TwiHost::new(sim, 10);
        owned(&mut host);

        host.write(0x00).unwrap();
        assert_eq!(host.write(0xA8), Err(TwiError::Timeout { polls: 10 }));
    }

    #[test]
    fn test_zero_budget_still_polls_once() {
        let mut host = TwiHost::new(SimTwi::new().with_peer(Peer::new(OLED)), 0);
        owned(&mut host);
        assert!(host.write(0x00).is_ok());
    }

    #[test]
    fn test_write_before_start_is_rejected() {
        let mut host = host_with_peer();
        host.set_address(OLED).unwrap();
        host.initialize(76).unwrap();

        assert!(matches!(
            host.write(0x00),
            Err(TwiError::Sequence { command: Command::Write, .. })
        ));
        assert!(host.registers().transmitted().is_empty());
    }

    #[test]
    fn test_stop_releases_bus() {
        let mut host = host_with_peer();
        owned(&mut host);
        host.write(0xAF).unwrap();
        host.stop().unwrap();

        assert!(host.status().is_clean_idle());
        assert_eq!(host.registers().stops(), 1);
        assert_eq!(host.session(), Session::Stopped);
    }

    #[test]
    fn test_stop_when_idle_is_harmless() {
        let mut host = host_with_peer();
        host.set_address(OLED).unwrap();
        host.initialize(76).unwrap();

        host.stop().unwrap();
        host.stop().unwrap();

        assert_eq!(host.status().bus_state(), BusState::Idle);
        assert_eq!(host.registers().stops(), 0);
    }

    #[test]
    fn test_enable_interrupts_sets_both_enables() {
        let mut host = host_with_peer();
        owned(&mut host);
        host.enable_interrupts();

        let ctrl_a = host.registers().read_ctrl_a();
        assert_eq!(ctrl_a & (mctrla::WIEN | mctrla::RIEN), 0xC0);
        assert_eq!(ctrl_a & mctrla::ENABLE, mctrla::ENABLE);
        assert_eq!(host.session(), Session::Started);
    }

    #[test]
    fn test_enable_interrupts_keeps_session() {
        let mut host = host_with_peer();
        host.enable_interrupts();
        assert_eq!(host.session(), Session::Uninitialized);

        host.set_address(OLED).unwrap();
        host.enable_interrupts();
        assert_eq!(host.session(), Session::AddressSet);

        // Still a legal point to initialize from
        host.initialize(76).unwrap();
        assert_eq!(host.session(), Session::Enabled);
    }

    static IRQ_COMPLETION: WriteCompletion = WriteCompletion::new();

    fn twi_irq() {
        IRQ_COMPLETION.signal();
    }

    #[test]
    fn test_interrupt_wait_consumes_completion() {
        let sim = SimTwi::new()
            .with_peer(Peer::new(OLED))
            .with_write_interrupt(twi_irq);
        let mut host = TwiHost::with_completion(sim, 100, &IRQ_COMPLETION);
        host.set_address(OLED).unwrap();
        host.initialize(76).unwrap();
        host.start().unwrap();
        // Address phase already raised WIF; enabling WIEN interrupts at once
        host.enable_interrupts();

        for byte in [0x00, 0xA8, 0x3F] {
            host.write(byte).unwrap();
        }

        assert_eq!(host.registers().transmitted(), &[0x00, 0xA8, 0x3F]);
        // Last byte completed and signalled; nobody consumed it yet
        assert!(IRQ_COMPLETION.take());
    }

    static SILENT_COMPLETION: WriteCompletion = WriteCompletion::new();

    #[test]
    fn test_interrupt_wait_times_out_without_signal() {
        let sim = SimTwi::new().with_peer(Peer::new(OLED));
        let mut host = TwiHost::with_completion(sim, 32, &SILENT_COMPLETION);
        owned(&mut host);

        // WIF is set but no handler runs
        assert!(host.status().write_ready());
        assert_eq!(host.write(0x00), Err(TwiError::Timeout { polls: 32 }));
    }
}
