//! Flight modes as reported over telemetry
//!
//! Ground stations written for ArduPilot decode HEARTBEAT `custom_mode`
//! with the plane or copter mode tables, so the vehicle's telemetry
//! flight mode is mapped onto those codes. Fixed-wing platforms use the
//! plane table, everything else the copter table.

/// Flight mode summarised for telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightMode {
    #[default]
    Manual,
    Acro,
    AcroAir,
    Angle,
    Horizon,
    AltitudeHold,
    PositionHold,
    Rth,
    Mission,
    Cruise,
    Launch,
    Failsafe,
}

impl FlightMode {
    /// Any mode except manual stabilises the airframe
    pub fn is_stabilized(self) -> bool {
        self != FlightMode::Manual
    }

    /// Modes where navigation steers the vehicle
    pub fn is_guided(self) -> bool {
        matches!(
            self,
            FlightMode::PositionHold | FlightMode::Rth | FlightMode::Mission
        )
    }
}

/// Airframe class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformType {
    #[default]
    Multirotor,
    Tricopter,
    Airplane,
    Rover,
    Boat,
    Helicopter,
    Other,
}

/// ArduPlane custom mode codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PlaneMode {
    Manual = 0,
    Circle = 1,
    Stabilize = 2,
    Training = 3,
    Acro = 4,
    FlyByWireA = 5,
    FlyByWireB = 6,
    Cruise = 7,
    Autotune = 8,
    Auto = 10,
    Rtl = 11,
    Loiter = 12,
    Takeoff = 13,
    AvoidAdsb = 14,
    Guided = 15,
    Initializing = 16,
    QStabilize = 17,
    QHover = 18,
    QLoiter = 19,
    QLand = 20,
    QRtl = 21,
    QAutotune = 22,
    EnumEnd = 23,
}

/// ArduCopter custom mode codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CopterMode {
    Stabilize = 0,
    Acro = 1,
    AltHold = 2,
    Auto = 3,
    Guided = 4,
    Loiter = 5,
    Rtl = 6,
    Circle = 7,
    Land = 9,
    Drift = 11,
    Sport = 13,
    Flip = 14,
    Autotune = 15,
    PosHold = 16,
    Brake = 17,
    Throw = 18,
    AvoidAdsb = 19,
    GuidedNoGps = 20,
    SmartRtl = 21,
    EnumEnd = 22,
}

impl PlaneMode {
    /// Plane mode for a telemetry flight mode
    pub fn from_flight_mode(mode: FlightMode) -> Self {
        match mode {
            FlightMode::Manual => PlaneMode::Manual,
            FlightMode::Acro | FlightMode::AcroAir => PlaneMode::Acro,
            FlightMode::Angle => PlaneMode::FlyByWireA,
            FlightMode::Horizon => PlaneMode::Stabilize,
            FlightMode::AltitudeHold => PlaneMode::FlyByWireB,
            FlightMode::PositionHold => PlaneMode::Loiter,
            FlightMode::Rth | FlightMode::Failsafe => PlaneMode::Rtl,
            FlightMode::Mission => PlaneMode::Auto,
            FlightMode::Cruise => PlaneMode::Cruise,
            FlightMode::Launch => PlaneMode::Takeoff,
        }
    }
}

impl CopterMode {
    /// Copter mode for a telemetry flight mode
    ///
    /// Manual and cruise have no copter equivalent.
    pub fn from_flight_mode(mode: FlightMode) -> Self {
        match mode {
            FlightMode::Acro | FlightMode::AcroAir => CopterMode::Acro,
            FlightMode::Angle | FlightMode::Horizon => CopterMode::Stabilize,
            FlightMode::AltitudeHold => CopterMode::AltHold,
            FlightMode::PositionHold => CopterMode::PosHold,
            FlightMode::Rth | FlightMode::Failsafe => CopterMode::Rtl,
            FlightMode::Mission => CopterMode::Auto,
            FlightMode::Launch => CopterMode::Throw,
            FlightMode::Manual | FlightMode::Cruise => CopterMode::EnumEnd,
        }
    }
}

/// HEARTBEAT `custom_mode` value
///
/// # Arguments
///
/// * `mode` - Current telemetry flight mode
/// * `fixed_wing` - Selects the plane table instead of the copter table
pub fn custom_mode(mode: FlightMode, fixed_wing: bool) -> u32 {
    if fixed_wing {
        PlaneMode::from_flight_mode(mode) as u32
    } else {
        CopterMode::from_flight_mode(mode) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [FlightMode; 12] = [
        FlightMode::Manual,
        FlightMode::Acro,
        FlightMode::AcroAir,
        FlightMode::Angle,
        FlightMode::Horizon,
        FlightMode::AltitudeHold,
        FlightMode::PositionHold,
        FlightMode::Rth,
        FlightMode::Mission,
        FlightMode::Cruise,
        FlightMode::Launch,
        FlightMode::Failsafe,
    ];

    #[test]
    fn test_plane_table() {
        let expected = [0, 4, 4, 5, 2, 6, 12, 11, 10, 7, 13, 11];
        for (mode, code) in ALL_MODES.iter().zip(expected) {
            assert_eq!(custom_mode(*mode, true), code, "{:?}", mode);
        }
    }

    #[test]
    fn test_copter_table() {
        let expected = [22, 1, 1, 0, 0, 2, 16, 6, 3, 22, 18, 6];
        for (mode, code) in ALL_MODES.iter().zip(expected) {
            assert_eq!(custom_mode(*mode, false), code, "{:?}", mode);
        }
    }

    #[test]
    fn test_unmapped_copter_modes_use_enum_end() {
        assert_eq!(
            CopterMode::from_flight_mode(FlightMode::Manual),
            CopterMode::EnumEnd
        );
        assert_eq!(
            CopterMode::from_flight_mode(FlightMode::Cruise),
            CopterMode::EnumEnd
        );
    }

    #[test]
    fn test_mode_flags() {
        assert!(!FlightMode::Manual.is_stabilized());
        assert!(FlightMode::Acro.is_stabilized());

        assert!(FlightMode::PositionHold.is_guided());
        assert!(FlightMode::Rth.is_guided());
        assert!(FlightMode::Mission.is_guided());
        assert!(!FlightMode::Failsafe.is_guided());
        assert!(!FlightMode::Angle.is_guided());
    }
}
