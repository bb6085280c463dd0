//! Behavioral model of the TWI host peripheral
//!
//! Models the host-side register semantics the boot sequence relies on:
//!
//! - MADDR written while enabled issues START; written while disabled it
//!   only latches the address
//! - MSTATUS flags are write-one-to-clear, writing bus state IDLE forces idle
//! - MDATA written while owning the bus transmits one byte; WIF rises once
//!   the byte completes, with RXACK reflecting the peer's answer
//! - MCTRLB MCMD=STOP releases an owned bus; on an idle bus it does nothing
//!
//! Transfers complete after a configurable number of MSTATUS reads so the
//! driver's ready wait can be exercised.
//!
//! The write interrupt is level-triggered: the handler runs whenever WIF and
//! WIEN are both set, whichever was set last. Like the firmware's handler it
//! leaves WIEN masked, so the driver has to re-arm it.

use nanotwi_hal::twi::{mctrla, mctrlb, mstatus, ADDR_READ};
use nanotwi_hal::{BusState, TwiRegisters};

/// Register identifiers for the access trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Baud,
    CtrlA,
    CtrlB,
    Status,
    Addr,
    Data,
}

/// One register write, in program order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub reg: Reg,
    pub value: u8,
}

/// Device attached to the simulated bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peer {
    /// 8-bit write address the peer answers to
    pub address: u8,
    /// Data byte index the peer NACKs, if any
    pub nack_at: Option<usize>,
}

impl Peer {
    /// A peer that acknowledges its address and every data byte
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            nack_at: None,
        }
    }

    /// NACK the data byte at `index` (0-based)
    pub const fn with_nack_at(mut self, index: usize) -> Self {
        self.nack_at = Some(index);
        self
    }
}

/// Simulated TWI host register block
#[derive(Debug, Clone)]
pub struct SimTwi {
    baud: u8,
    ctrl_a: u8,
    ctrl_b: u8,
    status: u8,
    addr: u8,

    peer: Option<Peer>,
    /// Another host holds the bus; START loses arbitration
    contention: bool,
    /// WIF never rises (e.g. clock line held low)
    stalled: bool,
    /// Status reads until an MDATA transfer completes
    latency: u32,
    pending: u32,
    pending_ack: bool,

    /// Runs while WIF and WIEN are both set; WIEN is masked afterwards
    write_interrupt: Option<fn()>,

    transmitted: Vec<u8>,
    starts: usize,
    stops: usize,
    trace: Vec<Access>,
}

impl Default for SimTwi {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTwi {
    /// Peripheral in its reset state with an empty bus
    pub fn new() -> Self {
        Self {
            baud: 0,
            ctrl_a: 0,
            ctrl_b: 0,
            status: BusState::Unknown as u8,
            addr: 0,
            peer: None,
            contention: false,
            stalled: false,
            latency: 0,
            pending: 0,
            pending_ack: false,
            write_interrupt: None,
            transmitted: Vec::new(),
            starts: 0,
            stops: 0,
            trace: Vec::new(),
        }
    }

    /// Attach a peer to the bus
    pub fn with_peer(mut self, peer: Peer) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Let another host hold the bus so START loses arbitration
    pub fn with_contention(mut self) -> Self {
        self.contention = true;
        self
    }

    /// Never raise WIF
    pub fn stalled(mut self) -> Self {
        self.stalled = true;
        self
    }

    /// Complete each byte transfer after `reads` status reads
    pub fn with_latency(mut self, reads: u32) -> Self {
        self.latency = reads;
        self
    }

    /// Invoke `handler` whenever WIF and WIEN are both set
    ///
    /// WIEN is cleared after the handler returns.
    pub fn with_write_interrupt(mut self, handler: fn()) -> Self {
        self.write_interrupt = Some(handler);
        self
    }

    /// Bytes successfully put on the wire (address bytes excluded)
    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    /// Number of START conditions issued
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of STOP conditions issued
    pub fn stops(&self) -> usize {
        self.stops
    }

    /// Every register write in program order
    pub fn trace(&self) -> &[Access] {
        &self.trace
    }

    /// Current baud divisor
    pub fn baud(&self) -> u8 {
        self.baud
    }

    /// Current MADDR contents
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Current bus state
    pub fn bus_state(&self) -> BusState {
        BusState::from_bits(self.status)
    }

    fn enabled(&self) -> bool {
        self.ctrl_a & mctrla::ENABLE != 0
    }

    fn record(&mut self, reg: Reg, value: u8) {
        self.trace.push(Access { reg, value });
    }

    fn set_bus_state(&mut self, state: BusState) {
        self.status = (self.status & !mstatus::BUSSTATE_MASK) | state as u8;
    }

    /// Raise WIF with the given acknowledge outcome
    fn raise_wif(&mut self, acked: bool) {
        if self.stalled {
            return;
        }
        if acked {
            self.status &= !mstatus::RXACK;
        } else {
            self.status |= mstatus::RXACK;
        }
        self.status |= mstatus::WIF | mstatus::CLKHOLD;
        self.service_write_interrupt();
    }

    fn service_write_interrupt(&mut self) {
        if self.status & mstatus::WIF == 0 || self.ctrl_a & mctrla::WIEN == 0 {
            return;
        }
        if let Some(handler) = self.write_interrupt {
            handler();
            self.ctrl_a &= !mctrla::WIEN;
        }
    }

    fn issue_start(&mut self, value: u8) {
        self.status &= !(mstatus::WIF | mstatus::RIF | mstatus::CLKHOLD);
        match self.bus_state() {
            // START waits for a known bus state
            BusState::Unknown => {}
            BusState::Busy => {
                self.status |= mstatus::ARBLOST | mstatus::WIF;
            }
            BusState::Idle | BusState::Owner => {
                self.starts += 1;
                if self.contention {
                    self.set_bus_state(BusState::Busy);
                    self.status |= mstatus::ARBLOST | mstatus::WIF;
                    return;
                }
                self.set_bus_state(BusState::Owner);
                let acked = self
                    .peer
                    .map(|p| p.address == value & !ADDR_READ)
                    .unwrap_or(false);
                if value & ADDR_READ != 0 && acked {
                    self.status |= mstatus::RIF | mstatus::CLKHOLD;
                } else {
                    self.raise_wif(acked);
                }
            }
        }
    }

    fn complete_transfer(&mut self) {
        let acked = self.pending_ack;
        self.raise_wif(acked);
    }
}

impl TwiRegisters for SimTwi {
    fn write_baud(&mut self, divisor: u8) {
        self.record(Reg::Baud, divisor);
        self.baud = divisor;
    }

    fn read_ctrl_a(&self) -> u8 {
        self.ctrl_a
    }

    fn write_ctrl_a(&mut self, value: u8) {
        self.record(Reg::CtrlA, value);
        let was_enabled = self.enabled();
        self.ctrl_a = value;
        if was_enabled && !self.enabled() {
            self.pending = 0;
            self.set_bus_state(BusState::Unknown);
        }
        self.service_write_interrupt();
    }

    fn read_ctrl_b(&self) -> u8 {
        self.ctrl_b
    }

    fn write_ctrl_b(&mut self, value: u8) {
        self.record(Reg::CtrlB, value);
        // MCMD and FLUSH are strobes and read back as zero
        self.ctrl_b = value & mctrlb::ACKACT_NACK;

        if value & mctrlb::FLUSH != 0 {
            self.pending = 0;
            self.status &= !mstatus::CLEAR_MASK;
            self.set_bus_state(BusState::Unknown);
            return;
        }

        if value & mctrlb::MCMD_MASK == mctrlb::MCMD_STOP
            && self.enabled()
            && self.bus_state() == BusState::Owner
        {
            self.pending = 0;
            self.stops += 1;
            self.status &= !(mstatus::WIF | mstatus::RIF | mstatus::CLKHOLD);
            self.set_bus_state(BusState::Idle);
        }
    }

    fn read_status(&mut self) -> u8 {
        if self.pending > 0 {
            self.pending -= 1;
            if self.pending == 0 {
                self.complete_transfer();
            }
        }
        self.status
    }

    fn write_status(&mut self, value: u8) {
        self.record(Reg::Status, value);
        self.status &= !(value & mstatus::CLEAR_MASK);
        if value & mstatus::BUSSTATE_MASK == BusState::Idle as u8 {
            self.set_bus_state(BusState::Idle);
        }
    }

    fn read_addr(&self) -> u8 {
        self.addr
    }

    fn write_addr(&mut self, value: u8) {
        self.record(Reg::Addr, value);
        self.addr = value;
        if self.enabled() {
            self.issue_start(value);
        }
    }

    fn write_data(&mut self, value: u8) {
        self.record(Reg::Data, value);
        if !self.enabled() || self.bus_state() != BusState::Owner {
            return;
        }

        let index = self.transmitted.len();
        self.transmitted.push(value);
        self.pending_ack = self.peer.map(|p| p.nack_at != Some(index)).unwrap_or(false);
        self.status &= !(mstatus::WIF | mstatus::CLKHOLD);

        if self.latency == 0 {
            self.complete_transfer();
        } else {
            self.pending = self.latency;
        }
    }
}
