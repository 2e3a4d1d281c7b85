//! Loopback HIL Agent Protocol
//!
//! This crate defines the ASCII protocol between a test host and the agent
//! firmware. The host sends single command bytes; the device answers each
//! with one newline-terminated text line.
//!
//! # Protocol Overview
//!
//! ```text
//! host ──► '?' ─────────────► device
//! host ◄── "OK MSPM0_HIL_v1.0\n" ◄── device
//! ```
//!
//! | Byte        | Response                          |
//! |-------------|-----------------------------------|
//! | `?`         | `OK <identity>`                   |
//! | `H` / `L`   | `OK`                              |
//! | `R`         | `OK 0` or `OK 1`                  |
//! | `S`         | `OK <uptime_ms> <cmd_count>`      |
//! | `\r` / `\n` | (nothing)                         |
//! | other       | `E BAD_CMD`                       |
//!
//! The device side uses [`ByteClass`] and [`Response`]; the host side uses
//! [`Reply`] to decode lines.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod decimal;
pub mod reply;
pub mod response;

pub use command::{ByteClass, Command};
pub use decimal::{EncodeError, MAX_DIGITS};
pub use reply::{Reply, ReplyError};
pub use response::{Response, ResponseBuffer, ResponseError, MAX_RESPONSE_LEN};

/// Firmware identity reported by the `?` command
pub const FIRMWARE_IDENTITY: &str = "MSPM0_HIL_v1.0";

/// Unsolicited line sent once at boot, before the first command is read
pub const BOOT_BANNER: &str = "MSPM0_HIL_v1.0: Ready (Type H/L/R/S)\n";

/// Error token carried by the response to an unrecognized byte
pub const BAD_COMMAND_TOKEN: &str = "BAD_CMD";
