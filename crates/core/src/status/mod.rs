//! Status text selection
//!
//! Picks the STATUSTEXT line shown on the ground station from a snapshot
//! of the flight status. Several lines can apply at once; they take turns,
//! each holding the screen for [`ROTATION_INTERVAL_MS`]. The choice is a
//! pure function of the snapshot and the elapsed time, so a fixed clock
//! always yields the same line.
//!
//! # Priority
//!
//! 1. Armed in failsafe: failsafe phase, recovery hint, navigation state
//! 2. Armed otherwise: navigation state during RTH / waypoint / emergency
//!    landing, else autolaunch, else active assist modes
//! 3. Disarmed with arming blocked: "UNABLE TO ARM" alternating with the
//!    reason, or the invalid setting alternating with "INVALID SETTING"

pub mod messages;

use heapless::{String, Vec};

/// Maximum STATUSTEXT payload length
pub const STATUS_TEXT_LEN: usize = 50;

/// How long each candidate line stays on screen
pub const ROTATION_INTERVAL_MS: u64 = 1000;

/// Upper bound on simultaneously applicable lines
const MAX_CANDIDATES: usize = 4;

/// Severity attached to a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusSeverity {
    Critical,
    Warning,
    #[default]
    Info,
}

/// Status line ready for transmission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusText {
    pub severity: StatusSeverity,
    pub text: String<STATUS_TEXT_LEN>,
}

impl StatusText {
    /// Build a line, truncating to [`STATUS_TEXT_LEN`] bytes
    pub fn new(severity: StatusSeverity, text: &str) -> Self {
        Self::from_chars(severity, text.chars())
    }

    fn from_chars(severity: StatusSeverity, chars: impl Iterator<Item = char>) -> Self {
        let mut buf = String::new();
        for c in chars {
            if buf.push(c).is_err() {
                break;
            }
        }
        Self {
            severity,
            text: buf,
        }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

/// Pick one candidate for the current rotation slot
///
/// Index is `(elapsed_ms / ROTATION_INTERVAL_MS) % len`.
pub fn rotate<T>(elapsed_ms: u64, candidates: &[T]) -> Option<&T> {
    if candidates.is_empty() {
        return None;
    }
    let slot = (elapsed_ms / ROTATION_INTERVAL_MS) % candidates.len() as u64;
    candidates.get(slot as usize)
}

/// Failsafe state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailsafePhase {
    #[default]
    Idle,
    RxLossDetected,
    RxLossIdle,
    ReturnToHome,
    Landing,
    Landed,
    RxLossMonitoring,
    RxLossRecovered,
}

/// Navigation state machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    None,
    RthStart,
    RthEnroute,
    HoldInfinite,
    HoldTimed,
    WaypointEnroute,
    ProcessNext,
    DoJump,
    LandStart,
    EmergencyLanding,
    LandInProgress,
    HoverAboveHome,
    Landed,
    LandSettle,
    LandStartDescent,
}

/// Sensor reported by a hardware failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareSensor {
    Gyro,
    Accelerometer,
    Compass,
    Barometer,
    Gps,
    RangeFinder,
    PitotMeter,
}

/// Why navigation refuses to let the vehicle arm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavArmingBlocker {
    None,
    MissingGpsFix,
    NavigationActive,
    FirstWaypointTooFar,
    JumpWaypointError,
}

/// Highest-priority reason arming is disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingBlocker {
    FailsafeSystem,
    NotLevel,
    SensorsCalibrating,
    SystemOverloaded,
    NavigationUnsafe(NavArmingBlocker),
    CompassNotCalibrated,
    AccelerometerNotCalibrated,
    ArmSwitch,
    /// Failed sensor, `None` when the failure is not sensor specific
    HardwareFailure(Option<HardwareSensor>),
    BoxFailsafe,
    BoxKillswitch,
    RcLink,
    Throttle,
    RollPitchNotCentered,
    ServoAutotrim,
    OutOfMemory,
    InvalidSetting,
    Cli,
    PwmOutputError,
    CmsMenu,
    OsdMenu,
}

/// Flight status snapshot consumed by status text selection
#[derive(Debug, Clone, Default)]
pub struct FlightStatus {
    pub armed: bool,
    /// Failsafe flight mode engaged
    pub failsafe_active: bool,
    pub failsafe_phase: FailsafePhase,
    pub receiving_rx_data: bool,
    pub nav_state: NavState,
    pub nav_rth_active: bool,
    pub nav_waypoint_active: bool,
    pub emergency_landing: bool,
    /// Airframe flies like a plane (selects plane mode table and messages)
    pub fixed_wing: bool,
    /// Navigation is controlling a launch
    pub launch_active: bool,
    pub althold_active: bool,
    /// Altitude hold only runs inside angle mode on this airframe
    pub althold_requires_angle: bool,
    pub autotrim_active: bool,
    pub autotune_active: bool,
    pub headfree_active: bool,
    /// Highest-priority arming blocker while disarmed
    pub arming_blocker: Option<ArmingBlocker>,
    /// Name of the first setting failing validation
    pub invalid_setting: Option<&'static str>,
}

#[derive(Clone, Copy)]
struct Candidate {
    text: &'static str,
    severity: StatusSeverity,
}

impl Candidate {
    fn info(text: &'static str) -> Self {
        Self {
            text,
            severity: StatusSeverity::Info,
        }
    }
}

impl FlightStatus {
    /// Status line to show at `elapsed_ms`, if any
    pub fn status_text(&self, elapsed_ms: u64) -> Option<StatusText> {
        if self.armed {
            let candidates = if self.failsafe_active {
                self.failsafe_candidates()
            } else {
                self.flight_candidates()
            };
            return rotate(elapsed_ms, &candidates)
                .map(|c| StatusText::new(c.severity, c.text));
        }

        let blocker = self.arming_blocker?;
        let first_half = rotate(elapsed_ms, &[true, false]).copied().unwrap_or(true);

        if let Some(name) = self.invalid_setting {
            return Some(if first_half {
                StatusText::from_chars(
                    StatusSeverity::Info,
                    name.chars().map(|c| c.to_ascii_uppercase()),
                )
            } else {
                StatusText::new(StatusSeverity::Warning, messages::INVALID_SETTING)
            });
        }

        if first_half {
            Some(StatusText::new(
                StatusSeverity::Warning,
                messages::UNABLE_TO_ARM,
            ))
        } else {
            messages::arming_blocker(blocker, self.failsafe_phase, self.receiving_rx_data)
                .map(|text| StatusText::new(StatusSeverity::Info, text))
        }
    }

    fn failsafe_candidates(&self) -> Vec<Candidate, MAX_CANDIDATES> {
        let mut candidates = Vec::new();
        if let Some(text) = messages::failsafe_phase(self.failsafe_phase) {
            let _ = candidates.push(Candidate::info(text));
        }
        let _ = candidates.push(Candidate {
            text: messages::failsafe_info(self.receiving_rx_data),
            severity: StatusSeverity::Critical,
        });
        if let Some(text) = messages::navigation_state(self.nav_state, self.fixed_wing) {
            let _ = candidates.push(Candidate::info(text));
        }
        candidates
    }

    fn flight_candidates(&self) -> Vec<Candidate, MAX_CANDIDATES> {
        let mut candidates = Vec::new();
        if self.nav_rth_active || self.nav_waypoint_active || self.emergency_landing {
            if let Some(text) = messages::navigation_state(self.nav_state, self.fixed_wing) {
                let _ = candidates.push(Candidate::info(text));
            }
        } else if self.fixed_wing && self.launch_active {
            let _ = candidates.push(Candidate::info(messages::AUTOLAUNCH));
        } else {
            let assists = [
                (
                    self.althold_active && !self.althold_requires_angle,
                    messages::ALTITUDE_HOLD,
                ),
                (self.autotrim_active, messages::AUTOTRIM),
                (self.autotune_active, messages::AUTOTUNE),
                (self.headfree_active, messages::HEADFREE),
            ];
            for (active, text) in assists {
                if active {
                    let _ = candidates.push(Candidate::info(text));
                }
            }
        }
        candidates
    }
}
