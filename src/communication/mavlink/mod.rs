//! MAVLink Telemetry Link
//!
//! Streams vehicle telemetry to a ground control station and serves the
//! mission upload/download protocol over a single serial link.
//!
//! # Architecture
//!
//! - **Parser**: Byte-at-a-time frame assembly (v1 and v2)
//! - **Writer**: Message serialization with our system and component id
//! - **Dispatcher**: Routes inbound messages to the mission handler
//! - **Handlers**: Mission protocol and scheduled telemetry streams
//! - **State**: Vehicle snapshot the streams report
//! - **Task**: Tick-driven context tying the above together
//!
//! # Transport
//!
//! Any byte stream implementing [`transport::SerialTransport`]; an adapter
//! for `embedded-io` serial ports is provided.

pub mod config; // Link configuration
pub mod dispatcher; // Message dispatcher (routing to handlers)
pub mod handlers; // Message handlers
pub mod parser; // Message parsing
pub mod state; // Vehicle state snapshot
pub mod task; // Telemetry task context
pub mod transport; // Transport abstraction layer
pub mod writer; // Message writing

pub use config::TelemetryConfig;
pub use task::{MavlinkTelemetry, TickReport};
