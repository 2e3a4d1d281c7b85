//! Board configuration
//!
//! Generated at build time from `board.toml` (see build.rs). Provides the
//! UART framing, the test-line GPIO numbers and the `stimulus_pin!` /
//! `measurement_pin!` macros that move those pins out of the peripherals.

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
