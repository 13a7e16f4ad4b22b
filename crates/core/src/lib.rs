//! autopilot_link_core - Pure no_std logic behind the MAVLink telemetry link
//!
//! Everything here is a plain function of its inputs so it can be tested on
//! the host without a serial port or a codec.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Clock and mission storage injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`scheduler`]: Telemetry stream identifiers and the rate scheduler
//! - [`mission`]: Waypoint types and the mission store abstraction
//! - [`mode`]: Telemetry flight modes and ArduPilot custom mode tables
//! - [`status`]: Status text selection for the ground station

#![no_std]

pub mod mission;
pub mod mode;
pub mod scheduler;
pub mod status;
pub mod traits;
