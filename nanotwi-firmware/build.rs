//! Build script for nanotwi-firmware
//!
//! - Validates board.toml at compile time
//! - Generates `board_config.rs` constants in OUT_DIR

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use nanotwi_core::address::Address;
use nanotwi_core::baud;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Board {
    clock: Clock,
    bus: Bus,
    #[serde(default)]
    timing: Timing,
    #[serde(default)]
    serial: Serial,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Clock {
    host_hz: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Bus {
    frequency_hz: u32,
    address: u8,
    #[serde(default = "default_write_timeout_polls")]
    write_timeout_polls: u32,
    #[serde(default)]
    wait: Wait,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Wait {
    #[default]
    Poll,
    Interrupt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Timing {
    power_up_delay_ms: u32,
    settle_delay_ms: u32,
    blink_count: u8,
    blink_half_period_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            power_up_delay_ms: 20,
            settle_delay_ms: 25,
            blink_count: 5,
            blink_half_period_ms: 20,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Serial {
    baud: u32,
}

impl Default for Serial {
    fn default() -> Self {
        Self { baud: 115_200 }
    }
}

fn default_write_timeout_polls() -> u32 {
    nanotwi_core::config::DEFAULT_WRITE_TIMEOUT_POLLS
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=board.toml");

    let board = load_board(Path::new("board.toml"));
    validate(&board);
    generate(&board);

    println!("cargo:warning=board.toml validated successfully");
}

/// Read and parse board.toml
fn load_board(path: &Path) -> Board {
    if !path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file           ║\n\
            ║  in the nanotwi-firmware directory.                              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&content) {
        Ok(board) => board,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid board.toml                                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| format!("║  {:<64} ║", truncate_line(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clip `line` to 64 characters, marking the cut with "..."
fn truncate_line(line: &str) -> String {
    if line.chars().count() > 64 {
        let head: String = line.chars().take(61).collect();
        format!("{}...", head)
    } else {
        line.to_string()
    }
}

/// Check values against what the hardware and the boot sequence accept
fn validate(board: &Board) {
    let mut errors = Vec::new();

    if board.clock.host_hz == 0 {
        errors.push("[clock] host_hz must be non-zero".to_string());
    }

    if let Err(e) = baud::divisor(board.clock.host_hz, board.bus.frequency_hz) {
        errors.push(format!("[bus] frequency_hz: {}", e));
    }

    if let Err(e) = Address::new(board.bus.address) {
        errors.push(format!("[bus] address: {}", e));
    }

    if board.bus.write_timeout_polls == 0 {
        errors.push("[bus] write_timeout_polls must be at least 1".to_string());
    }

    if board.timing.blink_half_period_ms == 0 && board.timing.blink_count > 0 {
        errors.push("[timing] blink_half_period_ms must be non-zero".to_string());
    }

    if board.serial.baud == 0 {
        errors.push("[serial] baud must be non-zero".to_string());
    } else if 4 * u64::from(board.clock.host_hz) / u64::from(board.serial.baud) < 64 {
        errors.push("[serial] baud too high for host_hz".to_string());
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in board.toml                             ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Write `board_config.rs` into OUT_DIR
fn generate(board: &Board) {
    let out_dir = match env::var("OUT_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => panic!("OUT_DIR not set: {}", e),
    };

    let source = format!(
        "// Generated from board.toml by build.rs\n\
        \n\
        /// Boot parameters\n\
        pub const BOOT_CONFIG: BootConfig = BootConfig {{\n\
        \x20   host_clock_hz: {host_hz},\n\
        \x20   bus: I2cConfig {{ frequency: {frequency_hz} }},\n\
        \x20   address: match Address::new({address:#04X}) {{\n\
        \x20       Ok(address) => address,\n\
        \x20       Err(_) => panic!(\"board.toml address out of range\"),\n\
        \x20   }},\n\
        \x20   write_timeout_polls: {polls},\n\
        \x20   power_up_delay_ms: {power_up},\n\
        \x20   settle_delay_ms: {settle},\n\
        \x20   blink_count: {blinks},\n\
        \x20   blink_half_period_ms: {half_period},\n\
        }};\n\
        \n\
        /// Wait for write completion on the TWI0 host interrupt\n\
        pub const INTERRUPT_DRIVEN: bool = {interrupt};\n\
        \n\
        /// USART3 log output rate\n\
        pub const SERIAL_BAUD: u32 = {serial_baud};\n",
        host_hz = board.clock.host_hz,
        frequency_hz = board.bus.frequency_hz,
        address = board.bus.address,
        polls = board.bus.write_timeout_polls,
        power_up = board.timing.power_up_delay_ms,
        settle = board.timing.settle_delay_ms,
        blinks = board.timing.blink_count,
        half_period = board.timing.blink_half_period_ms,
        interrupt = board.bus.wait == Wait::Interrupt,
        serial_baud = board.serial.baud,
    );

    let path = out_dir.join("board_config.rs");
    if let Err(e) = fs::write(&path, source) {
        panic!("failed to write {}: {}", path.display(), e);
    }
}
