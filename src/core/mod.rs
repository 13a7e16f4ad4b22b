//! Core link infrastructure
//!
//! Pure scheduling, mission and status logic lives in `autopilot_link_core`;
//! this module holds the pieces that need the host crate, currently logging.

pub mod logging;
