//! Board-agnostic core logic for the loopback HIL agent
//!
//! This crate contains everything that runs on the device but does not
//! depend on a specific chip:
//!
//! - Free-running millisecond uptime clock shared with the timer interrupt
//! - Command counter
//! - Stimulus / measurement pin pair
//! - Command interpreter (classification, dispatch, response transmission)
//!
//! Hardware is reached only through `hil-hal` traits and `embedded-io-async`,
//! so the whole crate is tested on the host.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod clock;
pub mod counter;
pub mod interpreter;
pub mod pins;

pub use clock::UptimeClock;
pub use counter::CommandCounter;
pub use interpreter::{Interpreter, InterpreterState, ServeError, Served};
pub use pins::HilPins;
