//! Communication Protocols
//!
//! # Protocols
//!
//! - **MAVLink**: Ground control station link
//!   - Telemetry streaming (HEARTBEAT, SYS_STATUS, ATTITUDE, GPS, etc.)
//!   - Mission protocol (MISSION_* messages)

pub mod mavlink;
