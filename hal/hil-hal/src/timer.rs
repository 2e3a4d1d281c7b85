//! Periodic timer abstractions
//!
//! The uptime clock is driven by a hardware timer that raises an interrupt
//! on every period expiry. The interrupt handler only needs one capability
//! from the timer: clearing its pending flag so the next expiry is delivered.

/// Timer whose expiry interrupt must be acknowledged from the handler
///
/// Implementations must be callable from interrupt context: no blocking,
/// no allocation, bounded time.
pub trait TickSource {
    /// Clear the interrupt-pending flag for the expired period
    ///
    /// On sources with a software-cleared flag, skipping this stops interrupt
    /// delivery and any clock derived from it freezes. Sources whose flag is
    /// cleared by hardware implement it as a no-op.
    fn acknowledge(&self);
}

/// Periodic timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickConfig {
    /// Timer input clock in Hz
    pub source_hz: u32,
    /// Desired interrupt period in microseconds
    pub period_us: u32,
}

/// Error computing a timer reload value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickConfigError {
    /// Period shorter than one input clock cycle
    PeriodTooShort,
    /// Reload value does not fit the counter width
    PeriodTooLong,
}

impl TickConfig {
    /// One interrupt per millisecond
    pub const fn millisecond(source_hz: u32) -> Self {
        Self {
            source_hz,
            period_us: 1_000,
        }
    }

    /// Reload value for a down-counter that fires when it wraps through zero
    ///
    /// The counter counts `reload + 1` input cycles per period, so the value
    /// returned is one less than the cycle count. `max_reload` is the largest
    /// value the counter register accepts.
    pub fn reload_value(&self, max_reload: u32) -> Result<u32, TickConfigError> {
        let cycles = self.source_hz as u64 * self.period_us as u64 / 1_000_000;
        if cycles == 0 {
            return Err(TickConfigError::PeriodTooShort);
        }
        let reload = cycles - 1;
        if reload > max_reload as u64 {
            return Err(TickConfigError::PeriodTooLong);
        }
        Ok(reload as u32)
    }
}
