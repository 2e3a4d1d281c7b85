//! Build script for hil-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates board.toml at compile time
//! - Generates board_config.rs with the UART framing and test-line pins

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs wired to the host UART (UART0 TX/RX)
const UART_GPIOS: [u8; 2] = [0, 1];

/// Highest user GPIO on RP2040
const MAX_GPIO: u8 = 29;

fn main() {
    setup_linker();
    let board = validate_config();
    generate_board_config(&board);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated board settings
struct Board {
    baudrate: u32,
    data_bits: &'static str,
    parity: &'static str,
    stop_bits: &'static str,
    stimulus: u8,
    measurement: u8,
}

/// Validate board.toml and extract its settings
fn validate_config() -> Board {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the hil-firmware directory.                ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
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

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let board = Board {
        baudrate: validate_baudrate(&config, &mut errors),
        data_bits: validate_choice(
            &config,
            "data_bits",
            &[(7, "Seven"), (8, "Eight")],
            &mut errors,
        ),
        parity: validate_parity(&config, &mut errors),
        stop_bits: validate_choice(&config, "stop_bits", &[(1, "One"), (2, "Two")], &mut errors),
        stimulus: validate_pin(&config, "stimulus", &mut errors),
        measurement: validate_pin(&config, "measurement", &mut errors),
    };

    if errors.is_empty() && board.stimulus == board.measurement {
        errors.push(format!(
            "[pins] stimulus and measurement are both gpio{}",
            board.stimulus
        ));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid settings in board.toml                           ║\n\
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

    println!("cargo:warning=board.toml validated successfully");
    board
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn uart_field<'a>(config: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    config.get("uart").and_then(|uart| uart.get(key))
}

fn validate_baudrate(config: &toml::Value, errors: &mut Vec<String>) -> u32 {
    match uart_field(config, "baudrate") {
        Some(toml::Value::Integer(baud)) if (1_200..=921_600).contains(baud) => *baud as u32,
        Some(toml::Value::Integer(_)) => {
            errors.push("[uart] baudrate must be 1200-921600".to_string());
            0
        }
        Some(_) => {
            errors.push("[uart] baudrate must be an integer".to_string());
            0
        }
        None => {
            errors.push("[uart] missing 'baudrate'".to_string());
            0
        }
    }
}

/// Map an integer setting onto the matching `hil_hal::uart` variant name
fn validate_choice(
    config: &toml::Value,
    key: &str,
    choices: &[(i64, &'static str)],
    errors: &mut Vec<String>,
) -> &'static str {
    let value = match uart_field(config, key) {
        Some(toml::Value::Integer(v)) => *v,
        Some(_) => {
            errors.push(format!("[uart] {} must be an integer", key));
            return "";
        }
        None => {
            errors.push(format!("[uart] missing '{}'", key));
            return "";
        }
    };

    match choices.iter().find(|(v, _)| *v == value) {
        Some((_, variant)) => *variant,
        None => {
            let allowed = choices
                .iter()
                .map(|(v, _)| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(format!("[uart] {} must be one of {}", key, allowed));
            ""
        }
    }
}

fn validate_parity(config: &toml::Value, errors: &mut Vec<String>) -> &'static str {
    match uart_field(config, "parity") {
        Some(toml::Value::String(p)) => match p.as_str() {
            "none" => "None",
            "even" => "Even",
            "odd" => "Odd",
            _ => {
                errors.push("[uart] parity must be 'none', 'even', or 'odd'".to_string());
                ""
            }
        },
        Some(_) => {
            errors.push("[uart] parity must be a string".to_string());
            ""
        }
        None => {
            errors.push("[uart] missing 'parity'".to_string());
            ""
        }
    }
}

/// Parse a "gpioN" pin name and check it is usable as a test line
fn validate_pin(config: &toml::Value, key: &str, errors: &mut Vec<String>) -> u8 {
    let name = match config.get("pins").and_then(|pins| pins.get(key)) {
        Some(toml::Value::String(s)) => s.trim().to_string(),
        Some(_) => {
            errors.push(format!("[pins] {} must be a string like \"gpio2\"", key));
            return 0;
        }
        None => {
            errors.push(format!("[pins] missing '{}'", key));
            return 0;
        }
    };

    let pin = match name.strip_prefix("gpio").and_then(|n| n.parse::<u8>().ok()) {
        Some(pin) if pin <= MAX_GPIO => pin,
        _ => {
            errors.push(format!("[pins] {} = \"{}\" is not gpio0-gpio{}", key, name, MAX_GPIO));
            return 0;
        }
    };

    if UART_GPIOS.contains(&pin) {
        errors.push(format!("[pins] {} = gpio{} is used by the host UART", key, pin));
    }

    pin
}

/// Write board_config.rs into OUT_DIR
fn generate_board_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();

    write!(
        f,
        "// Generated by build.rs from board.toml\n\
         \n\
         /// Host UART framing\n\
         pub const UART: hil_hal::UartConfig = hil_hal::UartConfig {{\n\
         \x20   baudrate: {baud},\n\
         \x20   data_bits: hil_hal::uart::DataBits::{data_bits},\n\
         \x20   parity: hil_hal::uart::Parity::{parity},\n\
         \x20   stop_bits: hil_hal::uart::StopBits::{stop_bits},\n\
         }};\n\
         \n\
         /// GPIO driven by H/L\n\
         pub const STIMULUS_GPIO: u8 = {stim};\n\
         \n\
         /// GPIO sampled by R\n\
         pub const MEASUREMENT_GPIO: u8 = {meas};\n\
         \n\
         /// Take the stimulus pin out of the peripherals\n\
         macro_rules! stimulus_pin {{\n\
         \x20   ($p:expr) => {{\n\
         \x20       $p.PIN_{stim}\n\
         \x20   }};\n\
         }}\n\
         \n\
         /// Take the measurement pin out of the peripherals\n\
         macro_rules! measurement_pin {{\n\
         \x20   ($p:expr) => {{\n\
         \x20       $p.PIN_{meas}\n\
         \x20   }};\n\
         }}\n",
        baud = board.baudrate,
        data_bits = board.data_bits,
        parity = board.parity,
        stop_bits = board.stop_bits,
        stim = board.stimulus,
        meas = board.measurement,
    )
    .unwrap();
}
