//! Host tooling for the loopback HIL agent
//!
//! [`client::HilClient`] speaks the single-character protocol over a serial
//! port; [`suite`] runs the bench validation checks on top of it.

pub mod client;
pub mod suite;

pub use client::{ClientError, HilClient, Link};
pub use suite::{Report, SuiteOptions};
