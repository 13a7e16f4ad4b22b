//! Status text tables
//!
//! Every string fits a single 50-byte STATUSTEXT payload.

use super::{ArmingBlocker, FailsafePhase, HardwareSensor, NavArmingBlocker, NavState};

pub const RC_RX_LINK_LOST: &str = "!RC RX LINK LOST!";
pub const MOVE_STICKS_TO_EXIT_FS: &str = "!MOVE STICKS TO EXIT FS!";
pub const UNABLE_TO_ARM: &str = "UNABLE TO ARM";
pub const INVALID_SETTING: &str = "INVALID SETTING";
pub const AUTOLAUNCH: &str = "AUTOLAUNCH";
pub const ALTITUDE_HOLD: &str = "(ALTITUDE HOLD)";
pub const AUTOTRIM: &str = "(AUTOTRIM)";
pub const AUTOTUNE: &str = "(AUTOTUNE)";
pub const HEADFREE: &str = "(HEADFREE)";

/// Message describing the failsafe procedure in progress
pub fn failsafe_phase(phase: FailsafePhase) -> Option<&'static str> {
    match phase {
        FailsafePhase::ReturnToHome => Some("(RTH)"),
        FailsafePhase::Landing => Some("(EMERGENCY LANDING)"),
        FailsafePhase::Idle
        | FailsafePhase::RxLossDetected
        | FailsafePhase::RxLossIdle
        | FailsafePhase::Landed
        | FailsafePhase::RxLossMonitoring
        | FailsafePhase::RxLossRecovered => None,
    }
}

/// How the pilot leaves failsafe
pub fn failsafe_info(receiving_rx_data: bool) -> &'static str {
    if receiving_rx_data {
        MOVE_STICKS_TO_EXIT_FS
    } else {
        RC_RX_LINK_LOST
    }
}

/// Message for the navigation state machine's current state
pub fn navigation_state(state: NavState, fixed_wing: bool) -> Option<&'static str> {
    match state {
        NavState::RthStart => Some("STARTING RTH"),
        NavState::RthEnroute => Some("EN ROUTE TO HOME"),
        NavState::HoldTimed => Some("HOLDING WAYPOINT"),
        NavState::WaypointEnroute => Some("TO WP"),
        NavState::ProcessNext => Some("PREPARING FOR NEXT WAYPOINT"),
        NavState::EmergencyLanding => Some("EMERGENCY LANDING"),
        NavState::LandInProgress => Some("LANDING"),
        NavState::HoverAboveHome if fixed_wing => Some("LOITERING AROUND HOME"),
        NavState::HoverAboveHome => Some("HOVERING"),
        NavState::Landed => Some("LANDED"),
        NavState::LandSettle => Some("PREPARING TO LAND"),
        NavState::None
        | NavState::HoldInfinite
        | NavState::DoJump
        | NavState::LandStart
        | NavState::LandStartDescent => None,
    }
}

/// Why arming is blocked
///
/// `failsafe_phase` and `receiving_rx_data` refine the failsafe reason.
pub fn arming_blocker(
    blocker: ArmingBlocker,
    failsafe_phase: FailsafePhase,
    receiving_rx_data: bool,
) -> Option<&'static str> {
    let text = match blocker {
        ArmingBlocker::FailsafeSystem => {
            if failsafe_phase != FailsafePhase::RxLossMonitoring {
                "DISABLED BY FAILSAFE"
            } else if receiving_rx_data {
                // Arm switch has not been cycled since the link came back
                "TURN ARM SWITCH OFF"
            } else {
                RC_RX_LINK_LOST
            }
        }
        ArmingBlocker::NotLevel => "AIRCRAFT IS NOT LEVEL",
        ArmingBlocker::SensorsCalibrating => "SENSORS CALIBRATING",
        ArmingBlocker::SystemOverloaded => "SYSTEM OVERLOADED",
        ArmingBlocker::NavigationUnsafe(reason) => return navigation_blocker(reason),
        ArmingBlocker::CompassNotCalibrated => "COMPASS NOT CALIBRATED",
        ArmingBlocker::AccelerometerNotCalibrated => "ACCELEROMETER NOT CALIBRATED",
        ArmingBlocker::ArmSwitch => "DISABLE ARM SWITCH FIRST",
        ArmingBlocker::HardwareFailure(sensor) => hardware_failure(sensor),
        ArmingBlocker::BoxFailsafe => "FAILSAFE MODE ENABLED",
        ArmingBlocker::BoxKillswitch => "KILLSWITCH MODE ENABLED",
        ArmingBlocker::RcLink => "NO RC LINK",
        ArmingBlocker::Throttle => "THROTTLE IS NOT LOW",
        ArmingBlocker::RollPitchNotCentered => "ROLLPITCH NOT CENTERED",
        ArmingBlocker::ServoAutotrim => "AUTOTRIM IS ACTIVE",
        ArmingBlocker::OutOfMemory => "NOT ENOUGH MEMORY",
        ArmingBlocker::InvalidSetting => INVALID_SETTING,
        ArmingBlocker::Cli => "CLI IS ACTIVE",
        ArmingBlocker::PwmOutputError => "PWM INIT ERROR",
        // Menus are already on the pilot's screen
        ArmingBlocker::CmsMenu | ArmingBlocker::OsdMenu => return None,
    };
    Some(text)
}

fn navigation_blocker(reason: NavArmingBlocker) -> Option<&'static str> {
    match reason {
        NavArmingBlocker::None => None,
        NavArmingBlocker::MissingGpsFix => Some("WAITING FOR GPS FIX"),
        NavArmingBlocker::NavigationActive => Some("DISABLE NAVIGATION FIRST"),
        NavArmingBlocker::FirstWaypointTooFar => Some("FIRST WAYPOINT IS TOO FAR"),
        NavArmingBlocker::JumpWaypointError => Some("JUMP WAYPOINT MISCONFIGURED"),
    }
}

fn hardware_failure(sensor: Option<HardwareSensor>) -> &'static str {
    match sensor {
        Some(HardwareSensor::Gyro) => "GYRO FAILURE",
        Some(HardwareSensor::Accelerometer) => "ACCELEROMETER FAILURE",
        Some(HardwareSensor::Compass) => "COMPASS FAILURE",
        Some(HardwareSensor::Barometer) => "BAROMETER FAILURE",
        Some(HardwareSensor::Gps) => "GPS FAILURE",
        Some(HardwareSensor::RangeFinder) => "RANGE FINDER FAILURE",
        Some(HardwareSensor::PitotMeter) => "PITOT METER FAILURE",
        None => "HARDWARE FAILURE",
    }
}
