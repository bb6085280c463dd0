//! SSD1306 initialization stream
//!
//! Sent as a single transaction: one control byte selecting command mode,
//! followed by command/argument pairs from the SSD1306 datasheet
//! initialization flow.

/// SSD1306 control byte and commands
pub mod cmd {
    /// Control byte: Co=0, D/C#=0 (every following byte is a command)
    pub const CONTROL_COMMAND_STREAM: u8 = 0x00;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_INC: u8 = 0xC0;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_FOLLOW_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const DISPLAY_ON: u8 = 0xAF;
}

/// Stream length including the control byte
pub const INIT_STREAM_LEN: usize = 19;

/// Bytes transmitted at boot, in order
pub const INIT_STREAM: [u8; INIT_STREAM_LEN] = [
    cmd::CONTROL_COMMAND_STREAM,
    cmd::SET_MUX_RATIO,
    0x3F, // 64 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_INC,
    cmd::SET_COM_PINS,
    0x02, // Sequential COM config
    cmd::SET_CONTRAST,
    0x7F,
    cmd::DISPLAY_FOLLOW_RAM,
    cmd::SET_NORMAL,
    cmd::SET_CLOCK_DIV,
    0x80, // Default oscillator, divide by 1
    cmd::SET_CHARGE_PUMP,
    0x14, // Enable charge pump
    cmd::DISPLAY_ON,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_literal() {
        assert_eq!(
            INIT_STREAM,
            [
                0x00, 0xA8, 0x3F, 0xD3, 0x00, 0x40, 0xA1, 0xC0, 0xDA, 0x02, 0x81, 0x7F, 0xA4,
                0xA6, 0xD5, 0x80, 0x8D, 0x14, 0xAF,
            ]
        );
    }

    #[test]
    fn test_stream_ends_with_display_on() {
        assert_eq!(INIT_STREAM[0], cmd::CONTROL_COMMAND_STREAM);
        assert_eq!(INIT_STREAM[INIT_STREAM_LEN - 1], cmd::DISPLAY_ON);
    }
}
