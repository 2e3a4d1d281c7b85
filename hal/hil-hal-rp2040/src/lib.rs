//! RP2040-specific HAL for the loopback HIL agent
//!
//! This crate provides RP2040 implementations of the shared `hil-hal`
//! traits:
//!
//! - Stimulus output and pull-down measurement input over `embassy-rp` GPIO
//! - SysTick as the 1 ms uptime tick source
//! - Conversion of `hil_hal::UartConfig` into `embassy_rp::uart::Config`

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod timer;
pub mod uart;

// Re-export shared traits from hil-hal for convenience
pub use hil_hal::{InputPin, OutputPin, TickSource};
