//! autopilot_link - MAVLink telemetry adapter for autopilot serial links
//!
//! Streams vehicle state to a ground station at configured rates and runs
//! the mission upload and download protocol over a byte transport.
//!
//! Scheduling, mission and status text logic lives in the no_std
//! `autopilot_link_core` crate; this crate adds the MAVLink codec, the
//! transport adapters and the per-cycle orchestrator.

// Core infrastructure (logging)
pub mod core;

// Communication protocols (MAVLink)
pub mod communication;
