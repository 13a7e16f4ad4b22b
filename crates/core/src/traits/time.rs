//! Time abstraction for the telemetry tick.
//!
//! The orchestrator reads the clock once per cycle through [`TimeSource`],
//! so the send interval, message timestamps and status text rotation can
//! all be driven deterministically from tests with [`MockTime`].

use core::cell::Cell;

/// Monotonic clock counted from system start.
///
/// # Example
///
/// ```
/// use autopilot_link_core::traits::{MockTime, TimeSource};
///
/// fn interval_elapsed<T: TimeSource>(time: &T, last_batch_us: u64) -> bool {
///     time.elapsed_since(last_batch_us) >= 20_000 // 50Hz
/// }
///
/// let time = MockTime::new();
/// assert!(!interval_elapsed(&time, 0));
/// time.advance(20_000);
/// assert!(interval_elapsed(&time, 0));
/// ```
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses saturating subtraction so a reference in the future reads as zero.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }

    /// Milliseconds since boot as carried by MAVLink `time_boot_ms` fields.
    ///
    /// Wraps after roughly 49 days, matching the 32-bit wire field.
    fn boot_ms(&self) -> u32 {
        self.now_ms() as u32
    }
}

/// Mock time source with manual advancement.
///
/// # Example
///
/// ```
/// use autopilot_link_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance(1000); // 1ms
/// assert_eq!(time.now_us(), 1000);
/// assert_eq!(time.now_ms(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_starts_at_zero() {
        let time = MockTime::new();
        assert_eq!(time.now_us(), 0);
        assert_eq!(time.now_ms(), 0);
        assert_eq!(time.boot_ms(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000_000);
        assert_eq!(time.now_us(), 5_000_000);
        assert_eq!(time.now_ms(), 5000);
    }

    #[test]
    fn mock_time_advance_accumulates() {
        let time = MockTime::new();
        time.advance(500_000);
        time.advance(500_000);
        assert_eq!(time.now_us(), 1_000_000);
        assert_eq!(time.now_ms(), 1000);
    }

    #[test]
    fn elapsed_since_saturates_for_future_reference() {
        let time = MockTime::new();
        time.set(10_000);
        assert_eq!(time.elapsed_since(3_000), 7_000);
        assert_eq!(time.elapsed_since(50_000), 0);
    }

    #[test]
    fn boot_ms_wraps_at_32_bits() {
        let time = MockTime::with_initial((u32::MAX as u64 + 5) * 1000);
        assert_eq!(time.boot_ms(), 4);
    }

    #[test]
    fn ms_rounds_down() {
        let time = MockTime::new();
        time.set(1_999);
        assert_eq!(time.now_ms(), 1);
    }
}
