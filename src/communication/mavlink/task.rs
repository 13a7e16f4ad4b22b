//! MAVLink Telemetry Task
//!
//! Tick-driven context that owns everything the link needs between calls.
//!
//! # Task Responsibilities
//!
//! 1. **Message Reception**: Drain the transport into the parser, stopping at
//!    the first complete frame
//! 2. **Message Routing**: Dispatch that frame and send the reply
//! 3. **Telemetry Streaming**: Once per send interval, send the due streams
//!    unless an inbound request was served since the previous interval
//!
//! # Usage
//!
//! ```ignore
//! let mut link = MavlinkTelemetry::new(TelemetryConfig::default());
//! link.attach(UartTransport::new(uart));
//!
//! loop {
//!     let state = collect_vehicle_state();
//!     link.tick(&clock, &state, &mut mission);
//! }
//! ```

use super::{
    config::TelemetryConfig,
    dispatcher::{Dispatch, MessageDispatcher},
    handlers::{MissionState, TelemetryStreamer},
    parser::{MavlinkParser, ParserStats},
    state::VehicleState,
    transport::SerialTransport,
    writer::{MavlinkWriter, WriterStats},
};
use autopilot_link_core::mission::MissionStore;
use autopilot_link_core::traits::TimeSource;
use mavlink::common::MavMessage;
use mavlink::{MavHeader, Message};

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// An inbound message was handled this tick
    pub served_inbound: bool,
    /// A reply was written for it
    pub reply_sent: bool,
    /// The send interval elapsed this tick
    pub interval_elapsed: bool,
    /// Scheduled telemetry messages written this tick
    pub streamed: usize,
}

/// MAVLink telemetry link context
///
/// Inert until a transport is attached.
pub struct MavlinkTelemetry<T: SerialTransport> {
    config: TelemetryConfig,
    transport: Option<T>,
    parser: MavlinkParser,
    writer: MavlinkWriter,
    dispatcher: MessageDispatcher,
    streamer: TelemetryStreamer,
    /// Time of the last send-interval check (microseconds)
    last_batch_us: u64,
    /// An inbound request was served since the last interval check
    served: bool,
}

impl<T: SerialTransport> MavlinkTelemetry<T> {
    /// Create a detached link
    pub fn new(config: TelemetryConfig) -> Self {
        Self {
            config,
            transport: None,
            parser: MavlinkParser::new(),
            writer: MavlinkWriter::new(config.system_id, config.component_id, config.protocol),
            dispatcher: MessageDispatcher::new(config.system_id),
            streamer: TelemetryStreamer::new(config.max_rate_hz),
            last_batch_us: 0,
            served: false,
        }
    }

    /// Install a transport and start from a clean slate
    ///
    /// Applies the configured stream rates and resets every counter, the
    /// parser and any mission upload. A previously attached transport is
    /// returned. A configuration that fails [`TelemetryConfig::validate`]
    /// leaves the link untouched and hands `transport` straight back.
    pub fn attach(&mut self, transport: T) -> Option<T> {
        if let Err(e) = self.config.validate() {
            crate::log_error!("MAVLink telemetry not attached: {}", e);
            return Some(transport);
        }

        crate::log_info!(
            "MAVLink telemetry attached (system {}, component {})",
            self.config.system_id,
            self.config.component_id
        );

        self.streamer.configure(&self.config.rates);
        self.parser.reset();
        self.parser.reset_stats();
        self.writer = MavlinkWriter::new(
            self.config.system_id,
            self.config.component_id,
            self.config.protocol,
        );
        self.dispatcher.reset();
        self.last_batch_us = 0;
        self.served = false;

        self.transport.replace(transport)
    }

    /// Hand the transport back and go inert
    pub fn detach(&mut self) -> Option<T> {
        let transport = self.transport.take();
        if transport.is_some() {
            crate::log_info!("MAVLink telemetry detached");
        }
        transport
    }

    /// Whether a transport is attached
    pub fn is_active(&self) -> bool {
        self.transport.is_some()
    }

    /// Attached transport
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Mutable access to the attached transport
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }

    /// Link configuration
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Current mission upload state
    pub fn mission_state(&self) -> MissionState {
        self.dispatcher.mission_state()
    }

    /// Parser statistics
    pub fn parser_stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// Writer statistics
    pub fn writer_stats(&self) -> WriterStats {
        self.writer.stats()
    }

    /// Run one cycle of the link
    ///
    /// # Arguments
    ///
    /// * `clock` - Time source for the send interval and message timestamps
    /// * `state` - Vehicle snapshot for this cycle
    /// * `mission` - Mission list, borrowed for the duration of the tick
    pub fn tick<C, S>(&mut self, clock: &C, state: &VehicleState, mission: &mut S) -> TickReport
    where
        C: TimeSource,
        S: MissionStore + ?Sized,
    {
        let mut report = TickReport::default();
        let Some(transport) = self.transport.as_mut() else {
            return report;
        };

        if let Some((header, message)) = read_frame(&mut self.parser, transport) {
            crate::log_trace!("RX MAVLink msg ID={}", message.message_id());
            if let Dispatch::Handled(reply) =
                self.dispatcher
                    .dispatch(&header, &message, state.is_armed(), mission)
            {
                report.served_inbound = true;
                self.served = true;
                if let Some(reply) = reply {
                    report.reply_sent = send(&mut self.writer, transport, &reply);
                }
            }
        }

        let now = clock.now_us();
        if now.saturating_sub(self.last_batch_us) >= self.config.batch_interval_us() {
            report.interval_elapsed = true;
            // Skip this batch after serving a request to avoid clogging the link
            if !self.served {
                for message in self.streamer.update(state, clock).iter() {
                    if send(&mut self.writer, transport, message) {
                        report.streamed += 1;
                    }
                }
            }
            self.last_batch_us = now;
            self.served = false;
        }

        report
    }
}

/// Feed buffered bytes to the parser until one frame completes
fn read_frame<T>(parser: &mut MavlinkParser, transport: &mut T) -> Option<(MavHeader, MavMessage)>
where
    T: SerialTransport + ?Sized,
{
    while transport.bytes_available() > 0 {
        let byte = transport.read_byte()?;
        // Decode errors are counted by the parser, which resyncs on its own
        if let Ok(Some(frame)) = parser.parse_byte(byte) {
            return Some(frame);
        }
    }
    None
}

fn send<T>(writer: &mut MavlinkWriter, transport: &mut T, message: &MavMessage) -> bool
where
    T: SerialTransport + ?Sized,
{
    match writer.write_message(transport, message) {
        Ok(_) => true,
        Err(e) => {
            crate::log_warn!("TX MAVLink msg ID={} failed: {}", message.message_id(), e);
            false
        }
    }
}
