//! GPIO lines under test
//!
//! The constructors fix the electrical configuration the agent relies on:
//! the stimulus starts driven low and the measurement input always has a
//! pull-down, so an open loopback reads a deterministic 0.

use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;

/// Push-pull stimulus output
pub struct StimulusOutput<'d> {
    pin: Output<'d>,
}

impl<'d> StimulusOutput<'d> {
    /// Configure `pin` as a push-pull output driven low
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl hil_hal::OutputPin for StimulusOutput<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Measurement input with pull-down bias
pub struct MeasurementInput<'d> {
    pin: Input<'d>,
}

impl<'d> MeasurementInput<'d> {
    /// Bias applied to every measurement input
    pub const PULL: hil_hal::gpio::Pull = hil_hal::gpio::Pull::Down;

    /// Configure `pin` as an input with the pull-down enabled
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Input::new(pin, to_rp_pull(Self::PULL)),
        }
    }
}

impl hil_hal::InputPin for MeasurementInput<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

/// Map a chip-independent bias onto the RP2040 pad setting
pub fn to_rp_pull(pull: hil_hal::gpio::Pull) -> Pull {
    match pull {
        hil_hal::gpio::Pull::None => Pull::None,
        hil_hal::gpio::Pull::Up => Pull::Up,
        hil_hal::gpio::Pull::Down => Pull::Down,
    }
}
