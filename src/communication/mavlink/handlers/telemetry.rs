//! MAVLink Telemetry Streaming
//!
//! Turns the vehicle state snapshot into the six telemetry streams.
//!
//! # Streams
//!
//! | Stream            | Messages                                             |
//! |-------------------|------------------------------------------------------|
//! | `ExtendedStatus`  | SYS_STATUS                                           |
//! | `RcChannels`      | RC_CHANNELS_RAW                                      |
//! | `Position`        | GPS_RAW_INT, GLOBAL_POSITION_INT, GPS_GLOBAL_ORIGIN  |
//! | `Extra1`          | ATTITUDE                                             |
//! | `Extra2`          | VFR_HUD, HEARTBEAT                                   |
//! | `Extra3`          | BATTERY_STATUS, SCALED_PRESSURE, STATUSTEXT          |
//!
//! # Stream Rate Control
//!
//! [`TelemetryStreamer::update`] is called once per batch. Each stream's
//! [`RateScheduler`] counter decides whether it is due; due streams are
//! built in the order above.

use crate::communication::mavlink::state::{GpsFix, VehicleState};
use autopilot_link_core::mode::{self, PlatformType};
use autopilot_link_core::scheduler::{DataStream, RateScheduler, StreamRates};
use autopilot_link_core::status::StatusSeverity;
use autopilot_link_core::traits::TimeSource;
use heapless::Vec;
use mavlink::common::{
    GpsFixType, MavAutopilot, MavBatteryFunction, MavBatteryType, MavMessage, MavModeFlag,
    MavSeverity, MavState, MavSysStatusSensor, MavType, ATTITUDE_DATA, BATTERY_STATUS_DATA,
    GLOBAL_POSITION_INT_DATA, GPS_GLOBAL_ORIGIN_DATA, GPS_RAW_INT_DATA, HEARTBEAT_DATA,
    RC_CHANNELS_RAW_DATA, SCALED_PRESSURE_DATA, STATUSTEXT_DATA, SYS_STATUS_DATA, VFR_HUD_DATA,
};

/// Most messages a single stream produces
pub const MAX_STREAM_MESSAGES: usize = 3;

/// Most messages one batch produces (every stream due)
pub const MAX_BATCH_MESSAGES: usize = 11;

/// Sensors and controllers always reported present
const SENSORS_BASE: u32 = 35843;
const SENSORS_MAG: u32 = 4100;
const SENSORS_BARO: u32 = 8200;
const SENSORS_GPS: u32 = 16416;
/// Sensor bits (0-9) whose health is reported
const SENSORS_HEALTH_MASK: u32 = 1023;

/// MAVLink cells per BATTERY_STATUS
const BATTERY_CELLS: usize = 10;

const PWM_RANGE_MIN: i32 = 1000;
const PWM_RANGE_MAX: i32 = 2000;

/// Messages produced by one stream
pub type StreamMessages = Vec<MavMessage, MAX_STREAM_MESSAGES>;

/// Messages produced by one batch
pub type TelemetryBatch = Vec<MavMessage, MAX_BATCH_MESSAGES>;

/// Telemetry streamer for periodic message transmission
///
/// Owns the rate scheduler; message building is a pure function of the
/// vehicle state and the clock.
#[derive(Debug, Clone)]
pub struct TelemetryStreamer {
    scheduler: RateScheduler,
}

impl TelemetryStreamer {
    /// Create a streamer with every stream disabled
    ///
    /// # Arguments
    ///
    /// * `max_rate` - Batches per second
    pub fn new(max_rate: u8) -> Self {
        Self {
            scheduler: RateScheduler::new(max_rate),
        }
    }

    /// Apply stream rates and reset the counters
    pub fn configure(&mut self, rates: &StreamRates) {
        self.scheduler.configure(rates);
    }

    /// Scheduler state, for diagnostics
    pub fn scheduler(&self) -> &RateScheduler {
        &self.scheduler
    }

    /// Generate the messages of every stream due in this batch
    ///
    /// Each stream's counter is advanced exactly once per call.
    pub fn update<T: TimeSource>(&mut self, state: &VehicleState, time: &T) -> TelemetryBatch {
        let mut batch = TelemetryBatch::new();
        for stream in DataStream::ALL {
            if !self.scheduler.trigger(stream) {
                continue;
            }
            crate::log_trace!("Stream {} due", stream.name());
            for message in Self::build_stream(stream, state, time) {
                // Capacity covers every stream at once
                let _ = batch.push(message);
            }
        }
        batch
    }

    /// Build the messages of one stream
    ///
    /// The position stream is empty without a GPS sensor, and STATUSTEXT is
    /// only included when there is a status line to show.
    pub fn build_stream<T: TimeSource>(
        stream: DataStream,
        state: &VehicleState,
        time: &T,
    ) -> StreamMessages {
        let mut messages = StreamMessages::new();
        match stream {
            DataStream::ExtendedStatus => {
                let _ = messages.push(build_sys_status(state));
            }
            DataStream::RcChannels => {
                let _ = messages.push(build_rc_channels(state, time));
            }
            DataStream::Position => {
                if state.sensors.gps {
                    let _ = messages.push(build_gps_raw(state, time));
                    let _ = messages.push(build_global_position(state, time));
                    let _ = messages.push(build_gps_origin(state));
                }
            }
            DataStream::Extra1 => {
                let _ = messages.push(build_attitude(state, time));
            }
            DataStream::Extra2 => {
                let _ = messages.push(build_vfr_hud(state));
                let _ = messages.push(build_heartbeat(state));
            }
            DataStream::Extra3 => {
                let _ = messages.push(build_battery_status(state));
                let _ = messages.push(build_scaled_pressure(state, time));
                if let Some(text) = build_status_text(state, time) {
                    let _ = messages.push(text);
                }
            }
        }
        messages
    }
}

/// Linear integer rescale, truncating toward zero
fn scale_range(x: i32, src_min: i32, src_max: i32, dst_min: i32, dst_max: i32) -> i32 {
    (x - src_min) * (dst_max - dst_min) / (src_max - src_min) + dst_min
}

fn decidegrees_to_radians(ddeg: f32) -> f32 {
    (ddeg / 10.0).to_radians()
}

fn sensors_present(state: &VehicleState) -> u32 {
    let mut mask = SENSORS_BASE;
    if state.sensors.magnetometer {
        mask |= SENSORS_MAG;
    }
    if state.sensors.barometer {
        mask |= SENSORS_BARO;
    }
    if state.sensors.gps {
        mask |= SENSORS_GPS;
    }
    mask
}

fn current_battery(state: &VehicleState) -> i16 {
    if state.battery.current_enabled {
        state.battery.amperage_ca
    } else {
        -1
    }
}

fn battery_remaining(state: &VehicleState) -> i8 {
    if state.battery.voltage_enabled {
        state.battery.remaining_percent.min(100) as i8
    } else {
        -1
    }
}

fn build_sys_status(state: &VehicleState) -> MavMessage {
    let mask = sensors_present(state);
    let voltage_battery = if state.battery.voltage_enabled {
        state.battery.voltage_cv.saturating_mul(10)
    } else {
        0
    };

    MavMessage::SYS_STATUS(SYS_STATUS_DATA {
        onboard_control_sensors_present: MavSysStatusSensor::from_bits_truncate(mask),
        onboard_control_sensors_enabled: MavSysStatusSensor::from_bits_truncate(mask),
        onboard_control_sensors_health: MavSysStatusSensor::from_bits_truncate(
            mask & SENSORS_HEALTH_MASK,
        ),
        load: 0,
        voltage_battery,
        current_battery: current_battery(state),
        battery_remaining: battery_remaining(state),
        drop_rate_comm: 0,
        errors_comm: 0,
        errors_count1: 0,
        errors_count2: 0,
        errors_count3: 0,
        errors_count4: 0,
        ..Default::default()
    })
}

fn build_rc_channels<T: TimeSource>(state: &VehicleState, time: &T) -> MavMessage {
    let rc = &state.rc;
    let rssi = scale_range(i32::from(rc.rssi.min(1023)), 0, 1023, 0, 255);

    MavMessage::RC_CHANNELS_RAW(RC_CHANNELS_RAW_DATA {
        time_boot_ms: time.boot_ms(),
        chan1_raw: rc.channel(0),
        chan2_raw: rc.channel(1),
        chan3_raw: rc.channel(2),
        chan4_raw: rc.channel(3),
        chan5_raw: rc.channel(4),
        chan6_raw: rc.channel(5),
        chan7_raw: rc.channel(6),
        chan8_raw: rc.channel(7),
        port: 0,
        rssi: rssi as u8,
    })
}

fn gps_fix_type(fix: GpsFix) -> GpsFixType {
    match fix {
        GpsFix::NoData | GpsFix::NoFix => GpsFixType::GPS_FIX_TYPE_NO_FIX,
        GpsFix::Fix2D => GpsFixType::GPS_FIX_TYPE_2D_FIX,
        GpsFix::Fix3D => GpsFixType::GPS_FIX_TYPE_3D_FIX,
    }
}

fn build_gps_raw<T: TimeSource>(state: &VehicleState, time: &T) -> MavMessage {
    let gps = &state.gps;
    MavMessage::GPS_RAW_INT(GPS_RAW_INT_DATA {
        time_usec: time.now_us(),
        fix_type: gps_fix_type(gps.fix),
        lat: gps.lat,
        lon: gps.lon,
        alt: gps.alt_cm.saturating_mul(10),
        eph: gps.eph,
        epv: gps.epv,
        vel: gps.ground_speed_cms,
        cog: gps.ground_course_ddeg.saturating_mul(10),
        satellites_visible: gps.num_sat,
        ..Default::default()
    })
}

fn build_global_position<T: TimeSource>(state: &VehicleState, time: &T) -> MavMessage {
    let gps = &state.gps;
    // Yaw is 0..3600 decidegrees, hdg wants centidegrees
    let hdg = i32::from(state.attitude.yaw_ddeg).rem_euclid(3600) * 10;

    MavMessage::GLOBAL_POSITION_INT(GLOBAL_POSITION_INT_DATA {
        time_boot_ms: time.boot_ms(),
        lat: gps.lat,
        lon: gps.lon,
        alt: gps.alt_cm.saturating_mul(10),
        relative_alt: state.estimate.altitude_cm.saturating_mul(10),
        vx: 0,
        vy: 0,
        vz: 0,
        hdg: hdg as u16,
    })
}

fn build_gps_origin(state: &VehicleState) -> MavMessage {
    let home = &state.home;
    MavMessage::GPS_GLOBAL_ORIGIN(GPS_GLOBAL_ORIGIN_DATA {
        latitude: home.lat,
        longitude: home.lon,
        altitude: home.alt_cm.saturating_mul(10),
        ..Default::default()
    })
}

fn build_attitude<T: TimeSource>(state: &VehicleState, time: &T) -> MavMessage {
    let attitude = &state.attitude;
    MavMessage::ATTITUDE(ATTITUDE_DATA {
        time_boot_ms: time.boot_ms(),
        roll: decidegrees_to_radians(f32::from(attitude.roll_ddeg)),
        pitch: decidegrees_to_radians(-f32::from(attitude.pitch_ddeg)),
        yaw: decidegrees_to_radians(f32::from(attitude.yaw_ddeg)),
        rollspeed: 0.0,
        pitchspeed: 0.0,
        yawspeed: 0.0,
    })
}

fn build_vfr_hud(state: &VehicleState) -> MavMessage {
    let groundspeed = if state.sensors.gps {
        f32::from(state.gps.ground_speed_cms) / 100.0
    } else {
        0.0
    };
    let airspeed = if state.sensors.pitot {
        f32::from(state.airspeed_cms) / 100.0
    } else {
        0.0
    };
    let throttle = i32::from(state.throttle.effective()).clamp(PWM_RANGE_MIN, PWM_RANGE_MAX);

    MavMessage::VFR_HUD(VFR_HUD_DATA {
        airspeed,
        groundspeed,
        alt: state.estimate.altitude_cm as f32 / 100.0,
        climb: state.estimate.climb_rate_cms as f32 / 100.0,
        heading: state.attitude.yaw_ddeg / 10,
        throttle: scale_range(throttle, PWM_RANGE_MIN, PWM_RANGE_MAX, 0, 100) as u16,
    })
}

fn mav_type(platform: PlatformType) -> MavType {
    match platform {
        PlatformType::Multirotor => MavType::MAV_TYPE_QUADROTOR,
        PlatformType::Tricopter => MavType::MAV_TYPE_TRICOPTER,
        PlatformType::Airplane => MavType::MAV_TYPE_FIXED_WING,
        PlatformType::Rover => MavType::MAV_TYPE_GROUND_ROVER,
        PlatformType::Boat => MavType::MAV_TYPE_SURFACE_BOAT,
        PlatformType::Helicopter => MavType::MAV_TYPE_HELICOPTER,
        PlatformType::Other => MavType::MAV_TYPE_GENERIC,
    }
}

fn system_state(state: &VehicleState) -> MavState {
    if state.is_armed() {
        if state.status.failsafe_active {
            MavState::MAV_STATE_CRITICAL
        } else {
            MavState::MAV_STATE_ACTIVE
        }
    } else if state.calibrating {
        MavState::MAV_STATE_CALIBRATING
    } else {
        MavState::MAV_STATE_STANDBY
    }
}

fn build_heartbeat(state: &VehicleState) -> MavMessage {
    let mut base_mode = MavModeFlag::MAV_MODE_FLAG_MANUAL_INPUT_ENABLED
        | MavModeFlag::MAV_MODE_FLAG_CUSTOM_MODE_ENABLED;
    if state.is_armed() {
        base_mode |= MavModeFlag::MAV_MODE_FLAG_SAFETY_ARMED;
    }
    if state.flight_mode.is_stabilized() {
        base_mode |= MavModeFlag::MAV_MODE_FLAG_STABILIZE_ENABLED;
    }
    if state.flight_mode.is_guided() {
        base_mode |= MavModeFlag::MAV_MODE_FLAG_GUIDED_ENABLED;
    }

    MavMessage::HEARTBEAT(HEARTBEAT_DATA {
        custom_mode: mode::custom_mode(state.flight_mode, state.is_fixed_wing()),
        mavtype: mav_type(state.platform),
        autopilot: MavAutopilot::MAV_AUTOPILOT_GENERIC,
        base_mode,
        system_status: system_state(state),
        mavlink_version: 3,
    })
}

fn build_battery_status(state: &VehicleState) -> MavMessage {
    let battery = &state.battery;
    let mut voltages = [u16::MAX; BATTERY_CELLS];
    if battery.voltage_enabled {
        if battery.cell_count > 0 {
            let cells = usize::from(battery.cell_count).min(BATTERY_CELLS);
            let cell_mv = battery.average_cell_cv.saturating_mul(10);
            voltages[..cells].fill(cell_mv);
        } else {
            voltages[0] = battery.voltage_cv.saturating_mul(10);
        }
    } else {
        voltages[0] = 0;
    }

    let (current_consumed, energy_consumed) = if battery.current_enabled {
        (battery.mah_drawn, battery.mwh_drawn.saturating_mul(36))
    } else {
        (-1, -1)
    };

    MavMessage::BATTERY_STATUS(BATTERY_STATUS_DATA {
        id: 0,
        battery_function: MavBatteryFunction::MAV_BATTERY_FUNCTION_UNKNOWN,
        mavtype: MavBatteryType::MAV_BATTERY_TYPE_UNKNOWN,
        temperature: i16::MAX,
        voltages,
        current_battery: current_battery(state),
        current_consumed,
        energy_consumed,
        battery_remaining: battery_remaining(state),
        ..Default::default()
    })
}

fn build_scaled_pressure<T: TimeSource>(state: &VehicleState, time: &T) -> MavMessage {
    let temperature = if state.sensors.barometer {
        state.baro_temperature_ddeg
    } else {
        state.imu_temperature_ddeg
    };

    MavMessage::SCALED_PRESSURE(SCALED_PRESSURE_DATA {
        time_boot_ms: time.boot_ms(),
        press_abs: 0.0,
        press_diff: 0.0,
        temperature: temperature.saturating_mul(10),
        ..Default::default()
    })
}

fn mav_severity(severity: StatusSeverity) -> MavSeverity {
    match severity {
        StatusSeverity::Critical => MavSeverity::MAV_SEVERITY_CRITICAL,
        StatusSeverity::Warning => MavSeverity::MAV_SEVERITY_WARNING,
        StatusSeverity::Info => MavSeverity::MAV_SEVERITY_INFO,
    }
}

fn build_status_text<T: TimeSource>(state: &VehicleState, time: &T) -> Option<MavMessage> {
    let line = state.status.status_text(time.now_ms())?;

    let mut text = [0u8; 50];
    let bytes = line.as_str().as_bytes();
    let len = bytes.len().min(text.len());
    text[..len].copy_from_slice(&bytes[..len]);

    Some(MavMessage::STATUSTEXT(STATUSTEXT_DATA {
        severity: mav_severity(line.severity),
        text: text.into(),
        ..Default::default()
    }))
}
