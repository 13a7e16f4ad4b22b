//! Mission Waypoint Types
//!
//! Pure data types for the waypoint list that the telemetry link uploads
//! and serves.
//!
//! # Ownership
//!
//! The list belongs to the navigation subsystem. The link only sees it
//! through [`MissionStore`], so navigation can keep its own storage and
//! validation rules. [`MissionList`] is a fixed-capacity in-memory store
//! for hosts without one.
//!
//! # Waypoint Format
//!
//! - Latitude and longitude in degrees * 1e7
//! - Altitude in centimetres relative to home
//! - The last waypoint of a list carries [`WAYPOINT_FLAG_LAST`]

pub mod storage;

use core::fmt;

pub use storage::MissionList;

/// Maximum number of waypoints in a mission
pub const MAX_WAYPOINTS: usize = 60;

/// Flag value marking the final waypoint of a list
pub const WAYPOINT_FLAG_LAST: u8 = 0xA5;

/// What the vehicle does on reaching a waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WaypointAction {
    /// Fly to the position
    Waypoint = 1,
    /// Return to home
    Rth = 4,
}

/// Mission waypoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waypoint {
    pub action: WaypointAction,
    /// Latitude in degrees * 1e7
    pub lat: i32,
    /// Longitude in degrees * 1e7
    pub lon: i32,
    /// Altitude in centimetres
    pub alt_cm: i32,
    pub p1: i16,
    pub p2: i16,
    pub p3: i16,
    /// [`WAYPOINT_FLAG_LAST`] on the final waypoint, 0 otherwise
    pub flag: u8,
}

impl Default for Waypoint {
    fn default() -> Self {
        Self {
            action: WaypointAction::Waypoint,
            lat: 0,
            lon: 0,
            alt_cm: 0,
            p1: 0,
            p2: 0,
            p3: 0,
            flag: 0,
        }
    }
}

impl Waypoint {
    /// Create a waypoint with zero parameters
    ///
    /// # Arguments
    ///
    /// * `action` - Waypoint action
    /// * `lat` - Latitude in degrees * 1e7
    /// * `lon` - Longitude in degrees * 1e7
    /// * `alt_cm` - Altitude in centimetres
    pub fn new(action: WaypointAction, lat: i32, lon: i32, alt_cm: i32) -> Self {
        Self {
            action,
            lat,
            lon,
            alt_cm,
            ..Self::default()
        }
    }

    /// Mark this waypoint as the end of the list
    pub fn with_last_flag(mut self) -> Self {
        self.flag = WAYPOINT_FLAG_LAST;
        self
    }

    /// Whether this waypoint ends the list
    pub fn is_last(&self) -> bool {
        self.flag == WAYPOINT_FLAG_LAST
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        e7_to_degrees(self.lat)
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        e7_to_degrees(self.lon)
    }

    /// Altitude in metres
    pub fn altitude(&self) -> f32 {
        cm_to_meters(self.alt_cm)
    }

    /// Whether latitude and longitude lie on the globe
    ///
    /// RTH waypoints carry no position and always pass.
    pub fn has_valid_position(&self) -> bool {
        match self.action {
            WaypointAction::Rth => true,
            WaypointAction::Waypoint => {
                (-900_000_000..=900_000_000).contains(&self.lat)
                    && (-1_800_000_000..=1_800_000_000).contains(&self.lon)
            }
        }
    }
}

/// Errors reported by a [`MissionStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionError {
    /// Index beyond the store capacity
    Full {
        /// Store capacity
        capacity: usize,
    },
    /// Index would leave a gap in the list
    OutOfSequence {
        /// Requested index
        index: u16,
        /// Current waypoint count
        count: u16,
    },
    /// Store refuses changes, e.g. while a mission is executing
    Locked,
}

impl fmt::Display for MissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissionError::Full { capacity } => {
                write!(f, "Mission full (max {} waypoints)", capacity)
            }
            MissionError::OutOfSequence { index, count } => {
                write!(f, "Waypoint {} out of sequence (count {})", index, count)
            }
            MissionError::Locked => write!(f, "Mission store is locked"),
        }
    }
}

/// Access to the navigation subsystem's waypoint list
///
/// Indices are 0-based. Writing index 0 starts a new list; each write
/// sets the count to `index + 1`.
pub trait MissionStore {
    /// Number of stored waypoints
    fn count(&self) -> u16;

    /// Waypoint at `index`, if stored
    fn waypoint(&self, index: u16) -> Option<Waypoint>;

    /// Store a waypoint at `index`
    fn set_waypoint(&mut self, index: u16, waypoint: Waypoint) -> Result<(), MissionError>;

    /// Remove every waypoint
    fn reset(&mut self);

    /// Whether the stored list is complete and flyable
    fn is_valid(&self) -> bool;
}

/// Convert degrees to degrees * 1e7, rounding to nearest
pub fn degrees_to_e7(degrees: f64) -> i32 {
    round_to_i32(degrees * 1e7)
}

/// Convert degrees * 1e7 to degrees
pub fn e7_to_degrees(value: i32) -> f64 {
    value as f64 / 1e7
}

/// Convert metres to centimetres, rounding to nearest
pub fn meters_to_cm(meters: f32) -> i32 {
    round_to_i32(meters as f64 * 100.0)
}

/// Convert centimetres to metres
pub fn cm_to_meters(cm: i32) -> f32 {
    (cm as f64 / 100.0) as f32
}

// `f64::round` needs std; `as` saturates out-of-range values.
fn round_to_i32(value: f64) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_creation() {
        let wp = Waypoint::new(WaypointAction::Waypoint, 370_000_000, -1_220_000_000, 5000);
        assert_eq!(wp.action, WaypointAction::Waypoint);
        assert!((wp.latitude() - 37.0).abs() < 1e-9);
        assert!((wp.longitude() + 122.0).abs() < 1e-9);
        assert!((wp.altitude() - 50.0).abs() < 1e-6);
        assert!(!wp.is_last());
        assert!(wp.with_last_flag().is_last());
    }

    #[test]
    fn test_position_validity() {
        let ok = Waypoint::new(WaypointAction::Waypoint, 899_999_999, 1_800_000_000, 0);
        assert!(ok.has_valid_position());

        let bad_lat = Waypoint::new(WaypointAction::Waypoint, 950_000_000, 0, 0);
        assert!(!bad_lat.has_valid_position());

        let rth = Waypoint::new(WaypointAction::Rth, 950_000_000, 0, 0);
        assert!(rth.has_valid_position());
    }

    #[test]
    fn test_degree_conversion_rounds_to_nearest() {
        assert_eq!(degrees_to_e7(37.123_456_78), 371_234_568);
        assert_eq!(degrees_to_e7(-122.123_456_78), -1_221_234_568);
        assert_eq!(degrees_to_e7(0.0), 0);
    }

    #[test]
    fn test_degree_conversion_saturates() {
        assert_eq!(degrees_to_e7(1000.0), i32::MAX);
        assert_eq!(degrees_to_e7(-1000.0), i32::MIN);
    }

    #[test]
    fn test_altitude_conversion() {
        assert_eq!(meters_to_cm(12.34), 1234);
        assert_eq!(meters_to_cm(-0.5), -50);
        assert!((cm_to_meters(1234) - 12.34).abs() < 1e-4);
    }

    #[test]
    fn test_error_display() {
        extern crate std;
        use std::format;

        assert_eq!(
            format!("{}", MissionError::Full { capacity: 60 }),
            "Mission full (max 60 waypoints)"
        );
        assert_eq!(format!("{}", MissionError::Locked), "Mission store is locked");
    }
}
