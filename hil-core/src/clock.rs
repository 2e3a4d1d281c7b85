//! Millisecond uptime clock
//!
//! The clock is the only state shared between the timer interrupt and the
//! command loop. The interrupt is the single producer (`tick`), the command
//! loop the single consumer (`read`).
//!
//! # Concurrency
//!
//! The count lives in one naturally aligned 32-bit word. On every Cortex-M
//! core a 32-bit aligned load or store is a single bus access, so `read` can
//! never observe a half-written value regardless of where the interrupt
//! lands. The increment is a `fetch_add`: native on cores with LDREX/STREX,
//! and lowered by `portable-atomic` to a short critical section on Cortex-M0+
//! (enable its `critical-section` feature in the firmware).
//!
//! The counter wraps after `u32::MAX` milliseconds (about 49.7 days);
//! intervals across the wrap are a `wrapping_sub` of two reads.

use core::sync::atomic::Ordering;

use hil_hal::TickSource;
use portable_atomic::AtomicU32;

/// Free-running millisecond counter advanced by a periodic interrupt
pub struct UptimeClock {
    ms: AtomicU32,
}

impl Default for UptimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl UptimeClock {
    /// Create a clock at zero, suitable for a `static`
    pub const fn new() -> Self {
        Self {
            ms: AtomicU32::new(0),
        }
    }

    /// Current uptime in milliseconds
    ///
    /// Non-blocking; safe to call at any time from the main loop.
    pub fn read(&self) -> u32 {
        self.ms.load(Ordering::Relaxed)
    }

    /// Advance the clock by one millisecond
    ///
    /// Must only be called from the timer interrupt. Wraps on overflow.
    pub fn tick(&self) {
        self.ms.fetch_add(1, Ordering::Relaxed);
    }

    /// Timer interrupt body
    ///
    /// Acknowledges the expired period and then performs exactly one
    /// [`tick`](Self::tick). Non-blocking, bounded time, not reentrant.
    pub fn on_interrupt<T: TickSource>(&self, source: &T) {
        source.acknowledge();
        self.tick();
    }

    #[cfg(test)]
    pub(crate) const fn starting_at(ms: u32) -> Self {
        Self {
            ms: AtomicU32::new(ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use proptest::prelude::*;

    /// Tick source that records acknowledgements and the count seen at each
    struct MockTimer<'a> {
        clock: &'a UptimeClock,
        acks: Cell<u32>,
        pending: Cell<bool>,
        count_at_ack: Cell<Option<u32>>,
    }

    impl<'a> MockTimer<'a> {
        fn new(clock: &'a UptimeClock) -> Self {
            Self {
                clock,
                acks: Cell::new(0),
                pending: Cell::new(true),
                count_at_ack: Cell::new(None),
            }
        }
    }

    impl TickSource for MockTimer<'_> {
        fn acknowledge(&self) {
            self.acks.set(self.acks.get() + 1);
            self.pending.set(false);
            self.count_at_ack.set(Some(self.clock.read()));
        }
    }

    /// Source whose pending flag the hardware clears on exception entry
    struct SelfClearing;

    impl TickSource for SelfClearing {
        fn acknowledge(&self) {}
    }

    #[test]
    fn test_self_clearing_source_still_ticks() {
        let clock = UptimeClock::new();
        for _ in 0..10 {
            clock.on_interrupt(&SelfClearing);
        }
        assert_eq!(clock.read(), 10);
    }

    #[test]
    fn test_starts_at_zero() {
        let clock = UptimeClock::new();
        assert_eq!(clock.read(), 0);
    }

    #[test]
    fn test_tick_increments_by_one() {
        let clock = UptimeClock::new();
        clock.tick();
        assert_eq!(clock.read(), 1);
        clock.tick();
        clock.tick();
        assert_eq!(clock.read(), 3);
    }

    #[test]
    fn test_interrupt_acknowledges_before_increment() {
        let clock = UptimeClock::new();
        let timer = MockTimer::new(&clock);

        clock.on_interrupt(&timer);

        assert_eq!(timer.acks.get(), 1);
        assert!(!timer.pending.get());
        assert_eq!(timer.count_at_ack.get(), Some(0));
        assert_eq!(clock.read(), 1);
    }

    #[test]
    fn test_every_interrupt_acknowledged() {
        let clock = UptimeClock::new();
        let timer = MockTimer::new(&clock);

        for _ in 0..1000 {
            timer.pending.set(true);
            clock.on_interrupt(&timer);
            assert!(!timer.pending.get());
        }

        assert_eq!(timer.acks.get(), 1000);
        assert_eq!(clock.read(), 1000);
    }

    #[test]
    fn test_wraps_on_overflow() {
        let clock = UptimeClock::starting_at(u32::MAX);
        let before = clock.read();
        clock.tick();
        assert_eq!(clock.read(), 0);
        assert_eq!(clock.read().wrapping_sub(before), 1);
    }

    #[test]
    fn test_concurrent_reader_sees_monotonic_values() {
        use std::sync::Arc;
        use std::thread;

        let clock = Arc::new(UptimeClock::new());
        let producer = {
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                for _ in 0..100_000 {
                    clock.tick();
                }
            })
        };

        let mut last = 0;
        while last < 100_000 {
            let now = clock.read();
            assert!(now >= last, "uptime went backwards: {} -> {}", last, now);
            last = now;
        }
        producer.join().unwrap();
        assert_eq!(clock.read(), 100_000);
    }

    proptest! {
        #[test]
        fn prop_elapsed_matches_ticks(start in any::<u32>(), ticks in 0u32..5_000) {
            let clock = UptimeClock::starting_at(start);
            let before = clock.read();
            for _ in 0..ticks {
                clock.tick();
            }
            prop_assert_eq!(clock.read().wrapping_sub(before), ticks);
        }
    }
}
