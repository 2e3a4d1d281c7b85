//! Command counter
//!
//! Counts every byte the interpreter treats as a command, recognized or not.
//! Owned by the interpreter and touched only from the main loop, so it is a
//! plain integer.

/// Monotonic (modulo wraparound) count of received commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandCounter {
    count: u32,
}

impl CommandCounter {
    /// Create a counter at zero
    pub const fn new() -> Self {
        Self { count: 0 }
    }

    /// Record one command and return the updated count
    pub fn record(&mut self) -> u32 {
        self.count = self.count.wrapping_add(1);
        self.count
    }

    /// Commands recorded so far
    pub fn get(&self) -> u32 {
        self.count
    }
}
