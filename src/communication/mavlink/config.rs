//! Telemetry link configuration

use autopilot_link_core::scheduler::{StreamRates, DEFAULT_MAX_RATE_HZ};
use mavlink::MavlinkVersion;

/// MAV_COMP_ID_SYSTEM_CONTROL
pub const DEFAULT_COMPONENT_ID: u8 = 250;

/// Telemetry link configuration
///
/// Read once when a transport is attached; changing rates takes effect on
/// the next `attach()`.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryConfig {
    /// MAVLink system ID of this vehicle; inbound mission messages
    /// addressed elsewhere are ignored
    pub system_id: u8,
    /// MAVLink component ID stamped on outbound frames
    pub component_id: u8,
    /// Outbound framing (inbound accepts both)
    pub protocol: MavlinkVersion,
    /// Scheduler batch rate in Hz, the upper bound for every stream rate
    pub max_rate_hz: u8,
    /// Per-stream rates in Hz (0 disables)
    pub rates: StreamRates,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            system_id: 1,
            component_id: DEFAULT_COMPONENT_ID,
            protocol: MavlinkVersion::V2,
            max_rate_hz: DEFAULT_MAX_RATE_HZ,
            rates: StreamRates::default(),
        }
    }
}

impl TelemetryConfig {
    /// Check the values the link cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system_id == 0 {
            return Err(ConfigError::InvalidSystemId);
        }
        if self.max_rate_hz == 0 {
            return Err(ConfigError::InvalidMaxRate);
        }
        Ok(())
    }

    /// Send interval in microseconds for the configured batch rate
    pub fn batch_interval_us(&self) -> u64 {
        1_000_000 / u64::from(self.max_rate_hz.max(1))
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// System ID 0 is the broadcast address
    #[error("System ID 0 is reserved for broadcast")]
    InvalidSystemId,
    /// The scheduler needs a non-zero batch rate
    #[error("Maximum stream rate must be at least 1 Hz")]
    InvalidMaxRate,
}
