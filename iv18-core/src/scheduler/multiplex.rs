//! Digit multiplexing state machine
//!
//! Only one grid of the tube is driven at a time. Every step moves to the
//! next digit, wrapping after the last one, so a full cycle of `N` steps
//! visits each digit exactly once in a fixed order.

/// Multiplex scheduler over `N` digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MultiplexScheduler<const N: usize> {
    /// Digit shown by the last step
    current: usize,
}

impl<const N: usize> Default for MultiplexScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MultiplexScheduler<N> {
    /// Create a scheduler whose first step selects digit 0
    pub const fn new() -> Self {
        Self {
            current: if N == 0 { 0 } else { N - 1 },
        }
    }

    /// Advance to the next digit and return it
    pub fn advance(&mut self) -> usize {
        if N == 0 {
            return 0;
        }
        self.current = (self.current + 1) % N;
        self.current
    }

    /// Digit selected by the most recent step
    pub fn current(&self) -> usize {
        self.current
    }

    /// Restart the cycle at digit 0
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of steps in one full cycle
    pub const fn cycle_len(&self) -> usize {
        N
    }
}
