//! MAVLink Protocol Handlers
//!
//! # Handlers
//!
//! - **Mission Handler**: MISSION_CLEAR_ALL, MISSION_COUNT, MISSION_ITEM[_INT],
//!   MISSION_REQUEST_LIST, MISSION_REQUEST[_INT]
//! - **Telemetry Streamer**: the six scheduled outbound streams

pub mod mission;
pub mod telemetry;

// Re-export commonly used types
pub use mission::{MissionHandler, MissionState};
pub use telemetry::TelemetryStreamer;
