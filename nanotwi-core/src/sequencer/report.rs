//! Boot outcome types

use core::fmt;

use nanotwi_hal::Status;

use super::commands::INIT_STREAM_LEN;
use crate::baud::BaudError;
use crate::driver::TwiError;

/// Reasons the boot sequence stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// Bus state was not OWNER after START; nothing was written
    NotOwner(Status),
    /// The byte at `index` of the stream never became writable
    Timeout { index: usize },
    /// Driver rejected a command (sequencing bug)
    Sequence(TwiError),
    /// Configured clocks give no usable divisor
    Baud(BaudError),
}

impl From<BaudError> for BootError {
    fn from(e: BaudError) -> Self {
        BootError::Baud(e)
    }
}

impl From<TwiError> for BootError {
    fn from(e: TwiError) -> Self {
        BootError::Sequence(e)
    }
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootError::NotOwner(status) => write!(
                f,
                "bus not owned after START (MSTATUS={:#04x})",
                status.bits()
            ),
            BootError::Timeout { index } => write!(f, "stream byte {} timed out", index),
            BootError::Sequence(e) => write!(f, "driver: {}", e),
            BootError::Baud(e) => write!(f, "baud: {}", e),
        }
    }
}

/// Advisory status check taken mid-stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Checkpoint {
    /// Stream index of the byte just written
    pub index: usize,
    /// MSTATUS right after staging that byte
    pub status: Status,
}

impl Checkpoint {
    /// True when no error flag was set
    pub fn clean(&self) -> bool {
        self.status.is_error_free()
    }
}

/// Result of a completed boot sequence
///
/// Only produced once every stream byte was staged, so there is one status
/// per stream index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootReport {
    /// Status observed before each byte was staged, by stream index
    pub write_statuses: [Status; INIT_STREAM_LEN],
    /// Check after the control byte
    pub first: Checkpoint,
    /// Check after the first command
    pub second: Checkpoint,
    /// MSTATUS after STOP and the settle delay
    pub final_status: Status,
}

impl BootReport {
    /// Number of bytes staged
    pub fn bytes_written(&self) -> usize {
        self.write_statuses.len()
    }

    /// True when the bus ended exactly IDLE with no flags
    pub fn finished_clean(&self) -> bool {
        self.final_status.is_clean_idle()
    }

    /// True when any staged byte reported an error flag on the next write
    pub fn any_write_errors(&self) -> bool {
        self.write_statuses.iter().any(|s| !s.is_error_free())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::state::{Command, Session};
    use std::string::ToString;

    #[test]
    fn test_not_owner_message_shows_status() {
        let err = BootError::NotOwner(Status::from_bits(0x0B));
        assert_eq!(err.to_string(), "bus not owned after START (MSTATUS=0x0b)");
    }

    #[test]
    fn test_timeout_message_names_index() {
        let err = BootError::Timeout { index: 7 };
        assert_eq!(err.to_string(), "stream byte 7 timed out");
    }

    #[test]
    fn test_driver_error_becomes_sequence() {
        let twi = TwiError::Sequence {
            state: Session::Uninitialized,
            command: Command::Write,
        };
        let err = BootError::from(twi);

        assert_eq!(err, BootError::Sequence(twi));
        assert_eq!(err.to_string(), "driver: Write not allowed in state Uninitialized");
    }

    #[test]
    fn test_driver_timeout_converts_as_sequence() {
        // Only the sequencer knows the stream index, so the blanket
        // conversion keeps the driver error intact
        let twi = TwiError::Timeout { polls: 50 };
        assert_eq!(BootError::from(twi), BootError::Sequence(twi));
    }

    #[test]
    fn test_baud_error_converts() {
        let err: BootError = BaudError::ZeroBusRate.into();
        assert_eq!(err, BootError::Baud(BaudError::ZeroBusRate));
        assert_eq!(err.to_string(), "baud: bus rate must be non-zero");
    }

    #[test]
    fn test_checkpoint_clean_tracks_error_flags() {
        let clean = Checkpoint {
            index: 0,
            status: Status::from_bits(0x62),
        };
        let nacked = Checkpoint {
            index: 1,
            status: Status::from_bits(0x72),
        };
        assert!(clean.clean());
        assert!(!nacked.clean());
    }
}
