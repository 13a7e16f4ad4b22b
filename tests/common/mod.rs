//! Ground station side of a loopback link

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;

use autopilot_link::communication::mavlink::parser::MavlinkParser;
use autopilot_link::communication::mavlink::transport::{SerialTransport, TransportError};
use mavlink::common::MavMessage;
use mavlink::MavHeader;

pub const GCS: MavHeader = MavHeader {
    system_id: 255,
    component_id: 190,
    sequence: 0,
};

/// Byte pipe between the vehicle link and a simulated ground station
#[derive(Default)]
pub struct Loopback {
    to_vehicle: VecDeque<u8>,
    from_vehicle: Vec<u8>,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a v2 frame from the ground station
    pub fn send(&mut self, message: &MavMessage) {
        let mut buf = Cursor::new(Vec::new());
        mavlink::write_v2_msg(&mut buf, GCS, message).unwrap();
        self.to_vehicle.extend(buf.into_inner());
    }

    /// Queue raw bytes
    pub fn send_raw(&mut self, bytes: &[u8]) {
        self.to_vehicle.extend(bytes.iter().copied());
    }

    /// Decode and drain everything the vehicle wrote
    pub fn receive(&mut self) -> Vec<(MavHeader, MavMessage)> {
        let mut parser = MavlinkParser::new();
        let bytes = std::mem::take(&mut self.from_vehicle);
        bytes
            .iter()
            .filter_map(|b| parser.parse_byte(*b).ok().flatten())
            .collect()
    }

    /// Raw bytes the vehicle wrote so far
    pub fn written(&self) -> &[u8] {
        &self.from_vehicle
    }

    pub fn pending(&self) -> usize {
        self.to_vehicle.len()
    }
}

impl SerialTransport for Loopback {
    fn bytes_available(&mut self) -> usize {
        self.to_vehicle.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.to_vehicle.pop_front()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        self.from_vehicle.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}
