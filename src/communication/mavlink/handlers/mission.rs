//! Mission Protocol Handler
//!
//! Handles mission upload and download via MAVLink protocol.
//!
//! # Mission Upload Flow (GCS → Autopilot)
//!
//! 1. GCS sends MISSION_COUNT with number of waypoints
//! 2. Autopilot responds with MISSION_REQUEST for seq=0
//! 3. GCS sends MISSION_ITEM (or MISSION_ITEM_INT) for seq=0
//! 4. Autopilot responds with MISSION_REQUEST for seq=1
//! 5. ... repeat until all waypoints received
//! 6. Autopilot validates the list and sends MISSION_ACK
//!
//! # Mission Download Flow (Autopilot → GCS)
//!
//! 1. GCS sends MISSION_REQUEST_LIST
//! 2. Autopilot responds with MISSION_COUNT
//! 3. GCS sends MISSION_REQUEST (or MISSION_REQUEST_INT) for each seq
//! 4. Autopilot responds with MISSION_ITEM (or MISSION_ITEM_INT)
//!
//! Downloads are stateless: every request is answered from the store.
//!
//! # Session Lifetime
//!
//! One upload session at a time. A new MISSION_COUNT replaces it; there is
//! no timeout, a stalled upload waits until the GCS retries or starts over.
//!
//! The list itself lives behind [`MissionStore`]. Uploaded items are refused
//! with `MAV_MISSION_ERROR` while the vehicle is armed; MISSION_CLEAR_ALL is
//! always honoured.

use autopilot_link_core::mission::{
    cm_to_meters, degrees_to_e7, meters_to_cm, MissionStore, Waypoint, WaypointAction,
    MAX_WAYPOINTS,
};
use mavlink::common::{
    MavCmd, MavFrame, MavMessage, MavMissionResult, MISSION_ACK_DATA, MISSION_CLEAR_ALL_DATA,
    MISSION_COUNT_DATA, MISSION_ITEM_DATA, MISSION_ITEM_INT_DATA, MISSION_REQUEST_DATA,
    MISSION_REQUEST_INT_DATA, MISSION_REQUEST_LIST_DATA,
};
use mavlink::MavHeader;

/// Mission upload state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MissionState {
    /// No upload in progress
    #[default]
    Idle,
    /// Upload in progress (GCS → Autopilot)
    AwaitingItem {
        /// Next expected sequence number
        expected: u16,
        /// Total waypoint count announced by MISSION_COUNT
        count: u16,
    },
}

/// Uploaded item with position already in storage units
struct IncomingItem {
    seq: u16,
    command: MavCmd,
    frame: MavFrame,
    autocontinue: u8,
    lat: i32,
    lon: i32,
    alt_cm: i32,
}

/// Mission protocol handler
///
/// Each `handle_*` method returns `None` when the message is addressed to
/// another system, otherwise the reply to send back to the sender.
pub struct MissionHandler {
    /// Our system ID; messages targeting other systems are ignored
    system_id: u8,
    /// Current upload state
    state: MissionState,
}

impl MissionHandler {
    /// Create a new mission handler
    ///
    /// # Arguments
    ///
    /// * `system_id` - MAVLink system ID of this vehicle
    pub fn new(system_id: u8) -> Self {
        Self {
            system_id,
            state: MissionState::Idle,
        }
    }

    /// Get current upload state
    pub fn state(&self) -> MissionState {
        self.state
    }

    /// Drop any upload in progress
    pub fn reset(&mut self) {
        self.state = MissionState::Idle;
    }

    fn is_for_us(&self, target_system: u8) -> bool {
        target_system == self.system_id
    }

    /// Handle MISSION_CLEAR_ALL message
    pub fn handle_clear_all<S>(
        &mut self,
        header: &MavHeader,
        data: &MISSION_CLEAR_ALL_DATA,
        store: &mut S,
    ) -> Option<MavMessage>
    where
        S: MissionStore + ?Sized,
    {
        if !self.is_for_us(data.target_system) {
            return None;
        }

        self.state = MissionState::Idle;
        store.reset();
        crate::log_info!("Mission cleared");
        Some(ack(header, MavMissionResult::MAV_MISSION_ACCEPTED))
    }

    /// Handle MISSION_COUNT message
    ///
    /// Starts an upload and requests item 0, even for a count of zero. The
    /// stored list is only replaced once items arrive.
    pub fn handle_count(
        &mut self,
        header: &MavHeader,
        data: &MISSION_COUNT_DATA,
        armed: bool,
    ) -> Option<MavMessage> {
        if !self.is_for_us(data.target_system) {
            return None;
        }

        if usize::from(data.count) > MAX_WAYPOINTS {
            crate::log_warn!(
                "Mission upload of {} items exceeds capacity {}",
                data.count,
                MAX_WAYPOINTS
            );
            let result = if armed {
                MavMissionResult::MAV_MISSION_ERROR
            } else {
                MavMissionResult::MAV_MISSION_NO_SPACE
            };
            return Some(ack(header, result));
        }

        crate::log_info!("Mission upload started: {} items", data.count);
        self.state = MissionState::AwaitingItem {
            expected: 0,
            count: data.count,
        };
        Some(request(header, 0))
    }

    /// Handle MISSION_ITEM message (position in degrees and metres)
    pub fn handle_item<S>(
        &mut self,
        header: &MavHeader,
        data: &MISSION_ITEM_DATA,
        armed: bool,
        store: &mut S,
    ) -> Option<MavMessage>
    where
        S: MissionStore + ?Sized,
    {
        if !self.is_for_us(data.target_system) {
            return None;
        }

        let item = IncomingItem {
            seq: data.seq,
            command: data.command,
            frame: data.frame,
            autocontinue: data.autocontinue,
            lat: degrees_to_e7(f64::from(data.x)),
            lon: degrees_to_e7(f64::from(data.y)),
            alt_cm: meters_to_cm(data.z),
        };
        Some(self.accept_item(header, item, armed, store))
    }

    /// Handle MISSION_ITEM_INT message (position in degrees * 1e7)
    pub fn handle_item_int<S>(
        &mut self,
        header: &MavHeader,
        data: &MISSION_ITEM_INT_DATA,
        armed: bool,
        store: &mut S,
    ) -> Option<MavMessage>
    where
        S: MissionStore + ?Sized,
    {
        if !self.is_for_us(data.target_system) {
            return None;
        }

        let item = IncomingItem {
            seq: data.seq,
            command: data.command,
            frame: data.frame,
            autocontinue: data.autocontinue,
            lat: data.x,
            lon: data.y,
            alt_cm: meters_to_cm(data.z),
        };
        Some(self.accept_item(header, item, armed, store))
    }

    fn accept_item<S>(
        &mut self,
        header: &MavHeader,
        item: IncomingItem,
        armed: bool,
        store: &mut S,
    ) -> MavMessage
    where
        S: MissionStore + ?Sized,
    {
        if armed {
            crate::log_warn!("Mission item {} refused while armed", item.seq);
            return ack(header, MavMissionResult::MAV_MISSION_ERROR);
        }

        let action = match item.command {
            MavCmd::MAV_CMD_NAV_WAYPOINT => WaypointAction::Waypoint,
            MavCmd::MAV_CMD_NAV_RETURN_TO_LAUNCH => WaypointAction::Rth,
            _ => return ack(header, MavMissionResult::MAV_MISSION_UNSUPPORTED),
        };
        if item.autocontinue == 0 {
            return ack(header, MavMissionResult::MAV_MISSION_UNSUPPORTED);
        }

        let frame_ok = item.frame == MavFrame::MAV_FRAME_GLOBAL_RELATIVE_ALT
            || (item.frame == MavFrame::MAV_FRAME_MISSION && action == WaypointAction::Rth);
        if !frame_ok {
            return ack(header, MavMissionResult::MAV_MISSION_UNSUPPORTED_FRAME);
        }

        let MissionState::AwaitingItem { expected, count } = self.state else {
            crate::log_debug!("Mission item {} without an upload", item.seq);
            return ack(header, MavMissionResult::MAV_MISSION_INVALID_SEQUENCE);
        };
        if item.seq != expected {
            crate::log_debug!("Mission item {} out of sequence, want {}", item.seq, expected);
            return ack(header, MavMissionResult::MAV_MISSION_INVALID_SEQUENCE);
        }

        let next = expected.saturating_add(1);
        let mut waypoint = Waypoint::new(action, item.lat, item.lon, item.alt_cm);
        if next >= count {
            waypoint = waypoint.with_last_flag();
        }

        if store.set_waypoint(expected, waypoint).is_err() {
            crate::log_error!("Mission store rejected item {}", expected);
            self.state = MissionState::Idle;
            return ack(header, MavMissionResult::MAV_MISSION_ERROR);
        }

        if next < count {
            self.state = MissionState::AwaitingItem {
                expected: next,
                count,
            };
            return request(header, next);
        }

        self.state = MissionState::Idle;
        if store.is_valid() {
            crate::log_info!("Mission upload complete: {} items", count);
            ack(header, MavMissionResult::MAV_MISSION_ACCEPTED)
        } else {
            crate::log_warn!("Uploaded mission failed validation");
            ack(header, MavMissionResult::MAV_MISSION_INVALID)
        }
    }

    /// Handle MISSION_REQUEST_LIST message
    pub fn handle_request_list<S>(
        &mut self,
        header: &MavHeader,
        data: &MISSION_REQUEST_LIST_DATA,
        store: &S,
    ) -> Option<MavMessage>
    where
        S: MissionStore + ?Sized,
    {
        if !self.is_for_us(data.target_system) {
            return None;
        }

        crate::log_info!("Mission download requested");
        Some(MavMessage::MISSION_COUNT(MISSION_COUNT_DATA {
            target_system: header.system_id,
            target_component: header.component_id,
            count: store.count(),
            ..Default::default()
        }))
    }

    /// Handle MISSION_REQUEST message, replying with MISSION_ITEM
    pub fn handle_request<S>(
        &mut self,
        header: &MavHeader,
        data: &MISSION_REQUEST_DATA,
        store: &S,
    ) -> Option<MavMessage>
    where
        S: MissionStore + ?Sized,
    {
        if !self.is_for_us(data.target_system) {
            return None;
        }

        let Some(waypoint) = stored(store, data.seq) else {
            return Some(ack(header, MavMissionResult::MAV_MISSION_INVALID_SEQUENCE));
        };
        let (frame, command) = frame_and_command(&waypoint);
        Some(MavMessage::MISSION_ITEM(MISSION_ITEM_DATA {
            target_system: header.system_id,
            target_component: header.component_id,
            seq: data.seq,
            frame,
            command,
            current: 0,
            autocontinue: 1,
            x: waypoint.latitude() as f32,
            y: waypoint.longitude() as f32,
            z: cm_to_meters(waypoint.alt_cm),
            ..Default::default()
        }))
    }

    /// Handle MISSION_REQUEST_INT message, replying with MISSION_ITEM_INT
    pub fn handle_request_int<S>(
        &mut self,
        header: &MavHeader,
        data: &MISSION_REQUEST_INT_DATA,
        store: &S,
    ) -> Option<MavMessage>
    where
        S: MissionStore + ?Sized,
    {
        if !self.is_for_us(data.target_system) {
            return None;
        }

        let Some(waypoint) = stored(store, data.seq) else {
            return Some(ack(header, MavMissionResult::MAV_MISSION_INVALID_SEQUENCE));
        };
        let (frame, command) = frame_and_command(&waypoint);
        Some(MavMessage::MISSION_ITEM_INT(MISSION_ITEM_INT_DATA {
            target_system: header.system_id,
            target_component: header.component_id,
            seq: data.seq,
            frame,
            command,
            current: 0,
            autocontinue: 1,
            x: waypoint.lat,
            y: waypoint.lon,
            z: cm_to_meters(waypoint.alt_cm),
            ..Default::default()
        }))
    }
}

fn stored<S>(store: &S, seq: u16) -> Option<Waypoint>
where
    S: MissionStore + ?Sized,
{
    if seq >= store.count() {
        return None;
    }
    store.waypoint(seq)
}

fn frame_and_command(waypoint: &Waypoint) -> (MavFrame, MavCmd) {
    match waypoint.action {
        WaypointAction::Rth => (MavFrame::MAV_FRAME_MISSION, MavCmd::MAV_CMD_NAV_RETURN_TO_LAUNCH),
        WaypointAction::Waypoint => (
            MavFrame::MAV_FRAME_GLOBAL_RELATIVE_ALT,
            MavCmd::MAV_CMD_NAV_WAYPOINT,
        ),
    }
}

fn ack(header: &MavHeader, result: MavMissionResult) -> MavMessage {
    MavMessage::MISSION_ACK(MISSION_ACK_DATA {
        target_system: header.system_id,
        target_component: header.component_id,
        mavtype: result,
        ..Default::default()
    })
}

fn request(header: &MavHeader, seq: u16) -> MavMessage {
    MavMessage::MISSION_REQUEST(MISSION_REQUEST_DATA {
        target_system: header.system_id,
        target_component: header.component_id,
        seq,
        ..Default::default()
    })
}
