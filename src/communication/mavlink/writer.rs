//! MAVLink Message Writer
//!
//! Message serialization and transmission using the rust-mavlink library.
//!
//! # Architecture
//!
//! - Serializes each message into a stack buffer sized for the largest frame
//! - Writes the whole frame to the transport in one call
//! - Stamps our system and component id and a wrapping sequence number
//! - Tracks statistics (messages sent, write errors)
//!
//! Failed writes are counted and reported to the caller; the link never
//! retries, the next scheduled batch simply carries fresh data.

use super::parser::MAX_FRAME_LEN;
use super::transport::{SerialTransport, TransportError};
use mavlink::common::MavMessage;
use mavlink::{MavHeader, MavlinkVersion};
use std::io::Cursor;

/// Writer statistics for monitoring and diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Total messages successfully sent
    pub messages_sent: u32,
    /// Transport write failures and short writes
    pub write_errors: u32,
    /// Messages the codec could not encode
    pub serialization_errors: u32,
}

/// MAVLink message writer
pub struct MavlinkWriter {
    /// System ID (our autopilot ID)
    system_id: u8,
    /// Component ID
    component_id: u8,
    /// Wire protocol version
    version: MavlinkVersion,
    /// Message sequence counter
    sequence: u8,
    /// Writer statistics
    stats: WriterStats,
}

impl MavlinkWriter {
    /// Create a new MAVLink writer
    ///
    /// # Arguments
    ///
    /// * `system_id` - MAVLink system ID (default: 1)
    /// * `component_id` - MAVLink component ID (default: 250)
    /// * `version` - Framing used for every outbound message
    pub fn new(system_id: u8, component_id: u8, version: MavlinkVersion) -> Self {
        Self {
            system_id,
            component_id,
            version,
            sequence: 0,
            stats: WriterStats::default(),
        }
    }

    /// Get writer statistics
    pub fn stats(&self) -> WriterStats {
        self.stats
    }

    /// Reset writer statistics
    pub fn reset_stats(&mut self) {
        self.stats = WriterStats::default();
    }

    /// Get current sequence number
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Wire protocol version
    pub fn version(&self) -> MavlinkVersion {
        self.version
    }

    /// Serialize a message and write it to the transport
    ///
    /// The sequence number advances even when the write fails, so the
    /// ground station sees the gap.
    ///
    /// # Returns
    ///
    /// Number of bytes written, or the reason the frame was not sent.
    pub fn write_message<T>(
        &mut self,
        transport: &mut T,
        message: &MavMessage,
    ) -> Result<usize, WriterError>
    where
        T: SerialTransport + ?Sized,
    {
        let header = MavHeader {
            system_id: self.system_id,
            component_id: self.component_id,
            sequence: self.sequence,
        };

        // Increment sequence for next message
        self.sequence = self.sequence.wrapping_add(1);

        let mut buffer = [0u8; MAX_FRAME_LEN];
        let len = {
            let mut cursor = Cursor::new(&mut buffer[..]);
            let encoded = match self.version {
                MavlinkVersion::V1 => mavlink::write_v1_msg(&mut cursor, header, message),
                MavlinkVersion::V2 => mavlink::write_v2_msg(&mut cursor, header, message),
            };
            match encoded {
                Ok(len) => len,
                Err(_) => {
                    self.stats.serialization_errors =
                        self.stats.serialization_errors.wrapping_add(1);
                    return Err(WriterError::Serialization);
                }
            }
        };

        match transport.write_bytes(&buffer[..len]) {
            Ok(written) if written == len => {
                self.stats.messages_sent = self.stats.messages_sent.wrapping_add(1);
                Ok(written)
            }
            Ok(written) => {
                self.stats.write_errors = self.stats.write_errors.wrapping_add(1);
                Err(WriterError::ShortWrite {
                    written,
                    expected: len,
                })
            }
            Err(e) => {
                self.stats.write_errors = self.stats.write_errors.wrapping_add(1);
                Err(WriterError::Transport(e))
            }
        }
    }
}

/// Writer error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriterError {
    /// The codec could not encode the message into a frame
    #[error("Message serialization failed")]
    Serialization,
    /// The transport accepted only part of the frame
    #[error("Short write ({written} of {expected} bytes)")]
    ShortWrite {
        /// Bytes accepted by the transport
        written: usize,
        /// Frame length
        expected: usize,
    },
    /// The transport reported an error
    #[error("Transport write failed: {0}")]
    Transport(#[from] TransportError),
}
