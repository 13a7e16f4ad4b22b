//! MAVLink Frame Parser
//!
//! Byte-at-a-time frame assembly on top of the rust-mavlink codec.
//!
//! # Architecture
//!
//! - Discards bytes until a v1 (`0xFE`) or v2 (`0xFD`) start marker
//! - Uses the length byte (and the v2 signed flag) to find the frame end
//! - Decodes the completed frame with `read_v1_msg()` / `read_v2_msg()`,
//!   which verifies the CRC
//! - Tracks statistics (messages received, parse errors)
//!
//! A frame that fails to decode is dropped whole and scanning resumes with
//! the next byte, so the parser resynchronises on the following frame.
//!
//! # Buffer Management
//!
//! - Frame buffer: 280 bytes (heapless::Vec), the largest signed v2 frame

use heapless::Vec;
use mavlink::common::MavMessage;
use mavlink::peek_reader::PeekReader;
use mavlink::MavHeader;
use std::io::Cursor;

/// MAVLink 1 start-of-frame marker
pub const MAV_STX_V1: u8 = 0xFE;

/// MAVLink 2 start-of-frame marker
pub const MAV_STX_V2: u8 = 0xFD;

/// Largest frame on the wire (v2, 255-byte payload, signed)
pub const MAX_FRAME_LEN: usize = 280;

/// v1 header (6) + CRC (2)
const V1_OVERHEAD: usize = 8;

/// v2 header (10) + CRC (2)
const V2_OVERHEAD: usize = 12;

/// v2 signature block appended when the signed flag is set
const V2_SIGNATURE_LEN: usize = 13;

/// v2 incompatibility flag: frame is signed
const V2_FLAG_SIGNED: u8 = 0x01;

/// Parser statistics for monitoring and diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserStats {
    /// Total messages successfully parsed
    pub messages_received: u32,
    /// Parse errors (CRC failures, unknown ids, malformed payloads)
    pub parse_errors: u32,
    /// Buffer overflow events (frame larger than the buffer)
    pub buffer_overflows: u32,
    /// Bytes dropped while hunting for a start marker
    pub bytes_discarded: u32,
}

/// MAVLink frame parser
///
/// Feed it one byte at a time with [`MavlinkParser::parse_byte`].
pub struct MavlinkParser {
    /// Bytes of the frame being assembled, starting at the marker
    frame: Vec<u8, MAX_FRAME_LEN>,
    /// Parser statistics
    stats: ParserStats,
}

impl MavlinkParser {
    /// Create a new MAVLink parser
    pub fn new() -> Self {
        Self {
            frame: Vec::new(),
            stats: ParserStats::default(),
        }
    }

    /// Get parser statistics
    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Reset parser statistics
    pub fn reset_stats(&mut self) {
        self.stats = ParserStats::default();
    }

    /// Drop any partially assembled frame
    pub fn reset(&mut self) {
        self.frame.clear();
    }

    /// Process a single byte from the transport
    ///
    /// # Arguments
    ///
    /// * `byte` - Next byte from the link
    ///
    /// # Returns
    ///
    /// - `Ok(Some((header, message)))` when this byte completed a valid frame
    /// - `Ok(None)` when more bytes are needed
    /// - `Err(ParserError)` when a completed frame failed to decode
    pub fn parse_byte(
        &mut self,
        byte: u8,
    ) -> Result<Option<(MavHeader, MavMessage)>, ParserError> {
        if self.frame.is_empty() && byte != MAV_STX_V1 && byte != MAV_STX_V2 {
            self.stats.bytes_discarded = self.stats.bytes_discarded.wrapping_add(1);
            return Ok(None);
        }

        if self.frame.push(byte).is_err() {
            self.frame.clear();
            self.stats.buffer_overflows = self.stats.buffer_overflows.wrapping_add(1);
            return Err(ParserError::BufferOverflow);
        }

        match self.frame_len() {
            Some(len) if self.frame.len() >= len => {}
            _ => return Ok(None),
        }

        let result = self.decode();
        self.frame.clear();

        match result {
            Ok(parsed) => {
                self.stats.messages_received = self.stats.messages_received.wrapping_add(1);
                Ok(Some(parsed))
            }
            Err(e) => {
                self.stats.parse_errors = self.stats.parse_errors.wrapping_add(1);
                crate::log_debug!("Dropped inbound frame: {}", e);
                Err(e)
            }
        }
    }

    /// Total frame length once enough header bytes are in
    fn frame_len(&self) -> Option<usize> {
        match self.frame.as_slice() {
            [MAV_STX_V1, len, ..] => Some(*len as usize + V1_OVERHEAD),
            [MAV_STX_V2, len, incompat, ..] => {
                let signature = if incompat & V2_FLAG_SIGNED != 0 {
                    V2_SIGNATURE_LEN
                } else {
                    0
                };
                Some(*len as usize + V2_OVERHEAD + signature)
            }
            _ => None,
        }
    }

    fn decode(&self) -> Result<(MavHeader, MavMessage), ParserError> {
        let mut reader = PeekReader::new(Cursor::new(self.frame.as_slice()));
        let parsed = if self.frame.first() == Some(&MAV_STX_V1) {
            mavlink::read_v1_msg::<MavMessage, _>(&mut reader)
        } else {
            mavlink::read_v2_msg::<MavMessage, _>(&mut reader)
        };
        parsed.map_err(|_| ParserError::InvalidFrame)
    }
}

impl Default for MavlinkParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parser error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParserError {
    /// CRC mismatch, unknown message id or malformed payload
    #[error("Invalid MAVLink frame")]
    InvalidFrame,
    /// Frame larger than the receive buffer
    #[error("RX buffer overflow")]
    BufferOverflow,
}
