//! Telemetry stream rate scheduler
//!
//! The telemetry link runs a fixed number of batches per second
//! (`max_rate`, 50 by default). Each stream owns a countdown counter; a
//! stream fires on a batch when its counter is zero and reloads it with
//! `max_rate / rate`. The counter then has to count back down to zero, so
//! consecutive triggers are `max_rate / rate + 1` batches apart.
//!
//! # Components
//!
//! - [`types`]: Stream identifiers and configured rates
//! - [`RateScheduler`]: Per-stream countdown counters
//!
//! # Example
//!
//! ```rust
//! use autopilot_link_core::scheduler::{DataStream, RateScheduler, StreamRates};
//!
//! let mut scheduler = RateScheduler::new(50);
//! scheduler.configure(&StreamRates::default());
//!
//! // Fresh counters fire on the first batch
//! assert!(scheduler.trigger(DataStream::Extra1));
//! ```

pub mod types;

pub use types::*;

/// Default batch rate of the telemetry link in Hz
pub const DEFAULT_MAX_RATE_HZ: u8 = 50;

/// Per-stream countdown scheduler
#[derive(Debug, Clone)]
pub struct RateScheduler {
    /// Batches per second, also the upper bound of any stream rate
    max_rate: u8,
    /// Configured rate per stream
    rates: [u8; STREAM_COUNT],
    /// Batches left before each stream fires again
    ticks: [u8; STREAM_COUNT],
}

impl RateScheduler {
    /// Create a scheduler with all streams disabled
    ///
    /// A `max_rate` of zero is treated as one batch per second.
    pub fn new(max_rate: u8) -> Self {
        Self {
            max_rate: max_rate.max(1),
            rates: [0; STREAM_COUNT],
            ticks: [0; STREAM_COUNT],
        }
    }

    /// Apply stream rates and reset every counter
    ///
    /// Called on link activation; every enabled stream fires on the next batch.
    pub fn configure(&mut self, rates: &StreamRates) {
        for stream in DataStream::ALL {
            self.rates[stream.index()] = rates.rate(stream);
        }
        self.reset();
    }

    /// Reset every counter to zero
    pub fn reset(&mut self) {
        self.ticks = [0; STREAM_COUNT];
    }

    /// Batch rate in Hz
    pub fn max_rate(&self) -> u8 {
        self.max_rate
    }

    /// Configured rate for `stream`
    pub fn rate(&self, stream: DataStream) -> u8 {
        self.rates[stream.index()]
    }

    /// Current counter for `stream`
    pub fn ticks(&self, stream: DataStream) -> u8 {
        self.ticks[stream.index()]
    }

    /// Counter reload value of `stream` after it fires
    ///
    /// Triggers are one batch further apart than this. Returns `None` for a
    /// disabled stream. Rates above `max_rate` are
    /// clamped to `max_rate`.
    pub fn period(&self, stream: DataStream) -> Option<u8> {
        let rate = self.rates[stream.index()];
        if rate == 0 {
            return None;
        }
        Some(self.max_rate / rate.min(self.max_rate))
    }

    /// Decide whether `stream` fires on this batch
    ///
    /// Call once per stream per batch. A counter of 0 fires and reloads;
    /// any other value counts down by one.
    pub fn trigger(&mut self, stream: DataStream) -> bool {
        let Some(period) = self.period(stream) else {
            return false;
        };

        let ticks = &mut self.ticks[stream.index()];
        if *ticks == 0 {
            *ticks = period;
            true
        } else {
            *ticks -= 1;
            false
        }
    }
}

impl Default for RateScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RATE_HZ)
    }
}
