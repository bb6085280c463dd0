//! TWI host register contract
//!
//! Bit layout of the ATmega4809 TWI host-side registers (datasheet
//! section 25.5) and a register-block trait the driver is written against.
//!
//! | Register | Access | Purpose |
//! |---|---|---|
//! | MBAUD   | write-once | bus clock divisor |
//! | MCTRLA  | read/write | enable, interrupt enables |
//! | MCTRLB  | write | FLUSH / ACKACT / MCMD commands |
//! | MSTATUS | read, write-one-to-clear | bus state and flags |
//! | MADDR   | read/write (write issues START) | address + direction |
//! | MDATA   | write (issues transfer) | outgoing byte |

/// MCTRLA bits
pub mod mctrla {
    /// Enable the TWI host
    pub const ENABLE: u8 = 0x01;
    /// Write interrupt enable
    pub const WIEN: u8 = 0x40;
    /// Read interrupt enable
    pub const RIEN: u8 = 0x80;
}

/// MCTRLB bits
pub mod mctrlb {
    /// Command field mask
    pub const MCMD_MASK: u8 = 0x03;
    /// Issue a STOP condition
    pub const MCMD_STOP: u8 = 0x03;
    /// Acknowledge action: send NACK instead of ACK
    pub const ACKACT_NACK: u8 = 0x04;
    /// Flush internal host state
    pub const FLUSH: u8 = 0x08;
}

/// MSTATUS bits
pub mod mstatus {
    /// Bus state field mask
    pub const BUSSTATE_MASK: u8 = 0x03;
    /// Bus error
    pub const BUSERR: u8 = 0x04;
    /// Arbitration lost
    pub const ARBLOST: u8 = 0x08;
    /// Received acknowledge (set = NACK received)
    pub const RXACK: u8 = 0x10;
    /// Clock hold
    pub const CLKHOLD: u8 = 0x20;
    /// Write interrupt flag
    pub const WIF: u8 = 0x40;
    /// Read interrupt flag
    pub const RIF: u8 = 0x80;

    /// All three error flags
    pub const ERROR_MASK: u8 = BUSERR | ARBLOST | RXACK;
    /// Flags cleared by writing a one
    pub const CLEAR_MASK: u8 = RIF | WIF | CLKHOLD | ARBLOST | BUSERR;
    /// Clear every flag and force the bus state to idle
    pub const FORCE_IDLE: u8 = CLEAR_MASK | super::BusState::Idle as u8;
}

/// MADDR direction bit (0 = write)
pub const ADDR_READ: u8 = 0x01;

/// Bus state as reported in MSTATUS bits 1:0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BusState {
    /// Controller does not know the bus state (after reset or disable)
    Unknown = 0x00,
    /// Bus is free
    Idle = 0x01,
    /// This host controls the bus
    Owner = 0x02,
    /// Another host controls the bus
    Busy = 0x03,
}

impl BusState {
    /// Decode the bus state field of a raw MSTATUS value
    pub const fn from_bits(bits: u8) -> Self {
        match bits & mstatus::BUSSTATE_MASK {
            0x00 => BusState::Unknown,
            0x01 => BusState::Idle,
            0x02 => BusState::Owner,
            _ => BusState::Busy,
        }
    }
}

/// Error flags reported in MSTATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorFlags {
    /// Another host won arbitration
    pub arbitration_lost: bool,
    /// Illegal START/STOP detected on the bus
    pub bus_error: bool,
    /// The peer answered the last byte or address with NACK
    pub nack: bool,
}

impl ErrorFlags {
    /// True when no error flag is set
    pub const fn is_clear(&self) -> bool {
        !(self.arbitration_lost || self.bus_error || self.nack)
    }
}

/// Decoded snapshot of MSTATUS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u8);

impl Status {
    /// Wrap a raw MSTATUS value
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw register value
    pub const fn bits(&self) -> u8 {
        self.0
    }

    /// Bus state field
    pub const fn bus_state(&self) -> BusState {
        BusState::from_bits(self.0)
    }

    /// Write interrupt flag: the data register can take the next byte
    pub const fn write_ready(&self) -> bool {
        self.0 & mstatus::WIF != 0
    }

    /// Error flags
    pub const fn error_flags(&self) -> ErrorFlags {
        ErrorFlags {
            arbitration_lost: self.0 & mstatus::ARBLOST != 0,
            bus_error: self.0 & mstatus::BUSERR != 0,
            nack: self.0 & mstatus::RXACK != 0,
        }
    }

    /// True when none of the error flags is set
    pub const fn is_error_free(&self) -> bool {
        self.0 & mstatus::ERROR_MASK == 0
    }

    /// True when the register reads exactly IDLE with every flag clear
    pub const fn is_clean_idle(&self) -> bool {
        self.0 == BusState::Idle as u8
    }
}

/// TWI host register block
///
/// One accessor per register. Implementations perform a single volatile
/// access per call; any side effect the hardware attaches to a write
/// (START on MADDR, a transfer on MDATA, a bus command on MCTRLB) is the
/// implementation's concern, not the caller's.
pub trait TwiRegisters {
    /// Write the baud divisor (MBAUD)
    fn write_baud(&mut self, divisor: u8);

    /// Read control register A (MCTRLA)
    fn read_ctrl_a(&self) -> u8;

    /// Write control register A (MCTRLA)
    fn write_ctrl_a(&mut self, value: u8);

    /// Read control register B (MCTRLB)
    fn read_ctrl_b(&self) -> u8;

    /// Write control register B (MCTRLB)
    fn write_ctrl_b(&mut self, value: u8);

    /// Read the status register (MSTATUS)
    fn read_status(&mut self) -> u8;

    /// Write the status register (MSTATUS)
    fn write_status(&mut self, value: u8);

    /// Read the address register (MADDR)
    fn read_addr(&self) -> u8;

    /// Write the address register (MADDR)
    fn write_addr(&mut self, value: u8);

    /// Write the data register (MDATA)
    fn write_data(&mut self, value: u8);
}
