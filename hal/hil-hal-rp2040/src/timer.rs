//! SysTick uptime source
//!
//! The embassy time driver owns the RP2040 TIMER block, so the agent's
//! millisecond clock runs from the core's SysTick instead. SysTick counts
//! down from its reload value at the system clock and raises the SysTick
//! exception each time it wraps.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

use hil_hal::timer::{TickConfig, TickConfigError};

/// Largest value the 24-bit SysTick reload register holds
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Arm SysTick to interrupt once per configured period
///
/// Runs from the processor clock. Returns the programmed reload value.
pub fn start_systick(syst: &mut SYST, config: TickConfig) -> Result<u32, TickConfigError> {
    let reload = config.reload_value(SYSTICK_MAX_RELOAD)?;

    syst.disable_counter();
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(reload);
    syst.clear_current();
    syst.enable_interrupt();
    syst.enable_counter();

    Ok(reload)
}

/// Acknowledge handle used from the SysTick exception
///
/// SysTick needs no acknowledge: the exception's pending bit is cleared by
/// hardware on entry and the counter reloads itself, so the next period
/// fires regardless. `acknowledge` is a no-op for this source. COUNTFLAG is
/// left set; nothing in the firmware polls it.
pub struct SysTickSource;

impl hil_hal::TickSource for SysTickSource {
    #[inline]
    fn acknowledge(&self) {}
}
