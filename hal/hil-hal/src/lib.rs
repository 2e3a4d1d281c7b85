//! HIL Agent Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the agent core is
//! written against. Chip-specific HALs implement them so the command logic
//! can be exercised on the host with mock pins and a mock tick source.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (hil-core, hil-firmware)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hil-hal (this crate - traits)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │   hil-hal-    │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`timer::TickSource`] - Periodic timer interrupt acknowledge
//! - [`uart::UartConfig`] - Chip-independent serial framing

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod timer;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use timer::TickSource;
pub use uart::UartConfig;
