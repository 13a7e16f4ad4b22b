//! Vehicle State Snapshot
//!
//! Everything the telemetry streams report, collected by the host from its
//! sensor and navigation subsystems before each tick.
//!
//! # State Components
//!
//! - **Mode**: Platform type, telemetry flight mode, flight status flags
//! - **Sensors**: Which optional sensors are fitted
//! - **Battery**: Voltage, current and consumption
//! - **GPS / Home**: Fix, position and home position
//! - **Attitude / Estimate**: Attitude and navigation altitude estimate
//! - **RC / Throttle**: Receiver channels and throttle source
//!
//! Units follow the flight controller's integer conventions (centivolts,
//! decidegrees, centimetres) so producers can copy values without scaling;
//! the telemetry streamer converts to MAVLink units.

use autopilot_link_core::mode::{FlightMode, PlatformType};
use autopilot_link_core::status::FlightStatus;
use heapless::Vec;

/// Maximum receiver channel count
pub const MAX_RC_CHANNELS: usize = 18;

/// Optional sensors fitted to the vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorPresence {
    pub gps: bool,
    pub magnetometer: bool,
    pub barometer: bool,
    pub pitot: bool,
}

/// Battery state
#[derive(Debug, Clone, Copy, Default)]
pub struct BatteryState {
    /// Voltage measurement configured
    pub voltage_enabled: bool,
    /// Pack voltage (centivolts)
    pub voltage_cv: u16,
    /// Current measurement configured
    pub current_enabled: bool,
    /// Current draw (10 mA units)
    pub amperage_ca: i16,
    /// Consumed capacity (mAh)
    pub mah_drawn: i32,
    /// Consumed energy (mWh)
    pub mwh_drawn: i32,
    /// Remaining capacity (percentage, 0-100)
    pub remaining_percent: u8,
    /// Detected cell count, 0 when unknown
    pub cell_count: u8,
    /// Average cell voltage (centivolts)
    pub average_cell_cv: u16,
}

/// GPS fix quality
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsFix {
    /// Receiver has not reported satellite data
    #[default]
    NoData,
    /// Satellite data but no position
    NoFix,
    Fix2D,
    Fix3D,
}

/// GPS solution
#[derive(Debug, Clone, Copy, Default)]
pub struct GpsState {
    pub fix: GpsFix,
    /// Latitude (degrees * 1e7)
    pub lat: i32,
    /// Longitude (degrees * 1e7)
    pub lon: i32,
    /// Altitude above mean sea level (centimetres)
    pub alt_cm: i32,
    /// Horizontal dilution of position (cm)
    pub eph: u16,
    /// Vertical dilution of position (cm)
    pub epv: u16,
    /// Ground speed (cm/s)
    pub ground_speed_cms: u16,
    /// Course over ground (decidegrees)
    pub ground_course_ddeg: u16,
    pub num_sat: u8,
}

/// Home position
#[derive(Debug, Clone, Copy, Default)]
pub struct HomePosition {
    /// Latitude (degrees * 1e7)
    pub lat: i32,
    /// Longitude (degrees * 1e7)
    pub lon: i32,
    /// Altitude (centimetres)
    pub alt_cm: i32,
}

/// Attitude in decidegrees
#[derive(Debug, Clone, Copy, Default)]
pub struct Attitude {
    pub roll_ddeg: i16,
    /// Nose up positive
    pub pitch_ddeg: i16,
    /// 0..3600
    pub yaw_ddeg: i16,
}

/// Navigation altitude estimate relative to home
#[derive(Debug, Clone, Copy, Default)]
pub struct NavEstimate {
    pub altitude_cm: i32,
    pub climb_rate_cms: i32,
}

/// Receiver input
#[derive(Debug, Clone, Default)]
pub struct RcInput {
    /// Channel values (PWM microseconds), first channel first
    pub channels: Vec<u16, MAX_RC_CHANNELS>,
    /// Link quality, 0..1023
    pub rssi: u16,
}

impl RcInput {
    /// Channel value by 0-based index, 0 when the receiver lacks it
    pub fn channel(&self, index: usize) -> u16 {
        self.channels.get(index).copied().unwrap_or(0)
    }
}

/// Throttle sources
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrottleState {
    /// RC throttle channel (PWM microseconds)
    pub rc_throttle: u16,
    /// Navigation throttle command (PWM microseconds)
    pub command: u16,
    /// Navigation drives the throttle
    pub navigation_controlled: bool,
}

impl ThrottleState {
    /// Throttle value reported to the ground station
    pub fn effective(&self) -> u16 {
        if self.navigation_controlled {
            self.command
        } else {
            self.rc_throttle
        }
    }
}

/// Vehicle state snapshot read by the telemetry streams
#[derive(Debug, Clone, Default)]
pub struct VehicleState {
    pub platform: PlatformType,
    pub flight_mode: FlightMode,
    /// Arming, failsafe and navigation flags
    pub status: FlightStatus,
    /// Sensor calibration running
    pub calibrating: bool,
    pub sensors: SensorPresence,
    pub battery: BatteryState,
    pub gps: GpsState,
    pub home: HomePosition,
    pub attitude: Attitude,
    pub estimate: NavEstimate,
    /// Airspeed (cm/s)
    pub airspeed_cms: u16,
    pub rc: RcInput,
    pub throttle: ThrottleState,
    /// Barometer temperature (decidegrees C)
    pub baro_temperature_ddeg: i16,
    /// IMU temperature (decidegrees C)
    pub imu_temperature_ddeg: i16,
}

impl VehicleState {
    /// Create an empty snapshot (disarmed, manual, no sensors)
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the vehicle is armed
    pub fn is_armed(&self) -> bool {
        self.status.armed
    }

    /// Fixed-wing platforms use the plane mode table and messages
    pub fn is_fixed_wing(&self) -> bool {
        self.status.fixed_wing
    }
}
