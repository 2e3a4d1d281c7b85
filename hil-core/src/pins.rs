//! Stimulus / measurement pin pair
//!
//! The stimulus output is driven by command; the measurement input is
//! sampled fresh on every read. With the loopback wire fitted, the
//! measurement follows the stimulus. Without it the input's pull-down makes
//! it read low, which the board layer guarantees when it builds the input.

use hil_hal::{InputPin, OutputPin};

/// The two digital lines under test
pub struct HilPins<O, I> {
    stimulus: O,
    measurement: I,
}

impl<O: OutputPin, I: InputPin> HilPins<O, I> {
    /// Take ownership of the pins and drive the stimulus low
    pub fn new(mut stimulus: O, measurement: I) -> Self {
        stimulus.set_low();
        Self {
            stimulus,
            measurement,
        }
    }

    /// Drive the stimulus pin to `high`
    ///
    /// Idempotent; never fails.
    pub fn set_stimulus(&mut self, high: bool) {
        self.stimulus.set_state(high);
    }

    /// Level the stimulus pin is currently driven to
    pub fn stimulus(&self) -> bool {
        self.stimulus.is_set_high()
    }

    /// Sample the measurement pin now
    pub fn read_measurement(&self) -> bool {
        self.measurement.is_high()
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{pins, Bench};
    use super::*;

    #[test]
    fn test_new_drives_stimulus_low() {
        let bench = Bench::wired();
        bench.driven.set(true);
        let (out, inp) = pins(&bench);

        let hil = HilPins::new(out, inp);

        assert!(!hil.stimulus());
        assert!(!bench.driven.get());
    }

    #[test]
    fn test_loopback_follows_stimulus() {
        let bench = Bench::wired();
        let (out, inp) = pins(&bench);
        let mut hil = HilPins::new(out, inp);

        hil.set_stimulus(true);
        assert!(hil.read_measurement());
        hil.set_stimulus(false);
        assert!(!hil.read_measurement());
    }

    #[test]
    fn test_set_is_idempotent() {
        let bench = Bench::wired();
        let (out, inp) = pins(&bench);
        let mut hil = HilPins::new(out, inp);

        hil.set_stimulus(true);
        hil.set_stimulus(true);
        assert!(hil.stimulus());
        assert!(hil.read_measurement());
    }

    #[test]
    fn test_unwired_reads_low() {
        let bench = Bench::unwired();
        let (out, inp) = pins(&bench);
        let mut hil = HilPins::new(out, inp);

        hil.set_stimulus(true);
        assert!(hil.stimulus());
        assert!(!hil.read_measurement());
    }

    #[test]
    fn test_measurement_sampled_every_read() {
        let bench = Bench::wired();
        let (out, inp) = pins(&bench);
        let hil = HilPins::new(out, inp);

        hil.read_measurement();
        hil.read_measurement();
        assert_eq!(bench.samples.get(), 2);
    }
}
