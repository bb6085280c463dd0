//! TWI host session state machine
//!
//! Tracks where the driver is in the bring-up lifecycle so register
//! writes are only issued in an order the hardware honors. The bus state
//! itself lives in MSTATUS; this machine only records what software has
//! asked for. Interrupt enables are plain control bits and never change
//! the session.

/// Driver session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Session {
    /// Nothing programmed since reset
    Uninitialized,
    /// Module disabled with the target address latched
    AddressSet,
    /// Baud programmed, status forced idle, module enabled
    Enabled,
    /// START issued; data writes allowed
    Started,
    /// STOP issued; a new START may follow
    Stopped,
}

/// Driver operations, as seen by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SetAddress,
    Initialize,
    Start,
    Write,
    Stop,
}

impl Session {
    /// Process a command and return the next state
    ///
    /// Returns `None` when the command is not allowed in this state.
    pub fn transition(self, command: Command) -> Option<Self> {
        use Command::*;
        use Session::*;

        match (self, command) {
            // Setting the address disables the module first, so it is
            // legal from anywhere
            (_, SetAddress) => Some(AddressSet),

            // Initialize needs a latched address
            (AddressSet, Initialize) => Some(Enabled),

            // START rewrites the latched address
            (Enabled, Start) | (Stopped, Start) | (Started, Start) => Some(Started),

            (Started, Write) => Some(Started),

            // STOP on an idle bus is harmless
            (Enabled, Stop) | (Started, Stop) | (Stopped, Stop) => Some(Stopped),

            _ => None,
        }
    }
}
