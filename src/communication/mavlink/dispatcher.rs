//! MAVLink Message Dispatcher
//!
//! Routes incoming MAVLink messages to the mission handler and reports
//! whether the link served the message.
//!
//! # Design Principles
//!
//! - **Zero-cost abstraction**: Uses match expressions, no trait objects
//! - **Handler ownership**: Dispatcher owns the mission handler
//! - **Borrowed state**: Armed flag and mission store are lent per message

use super::handlers::{MissionHandler, MissionState};
use autopilot_link_core::mission::MissionStore;
use mavlink::common::MavMessage;
use mavlink::MavHeader;

/// Outcome of dispatching one inbound message
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// No handler for this message, or addressed to another system
    Unhandled,
    /// Message served, with the reply to send back if any
    Handled(Option<MavMessage>),
}

impl Dispatch {
    /// Whether the message counts as served this cycle
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled(_))
    }
}

impl From<Option<MavMessage>> for Dispatch {
    fn from(reply: Option<MavMessage>) -> Self {
        match reply {
            Some(reply) => Dispatch::Handled(Some(reply)),
            None => Dispatch::Unhandled,
        }
    }
}

/// MAVLink message dispatcher
pub struct MessageDispatcher {
    /// Mission protocol handler
    mission_handler: MissionHandler,
}

impl MessageDispatcher {
    /// Create a dispatcher for the given system ID
    pub fn new(system_id: u8) -> Self {
        Self {
            mission_handler: MissionHandler::new(system_id),
        }
    }

    /// Dispatch an incoming MAVLink message to the appropriate handler
    ///
    /// # Arguments
    ///
    /// * `header` - Sender's header; replies are addressed to it
    /// * `message` - Parsed MAVLink message
    /// * `armed` - Vehicle armed, which locks mission uploads
    /// * `store` - Mission list
    pub fn dispatch<S>(
        &mut self,
        header: &MavHeader,
        message: &MavMessage,
        armed: bool,
        store: &mut S,
    ) -> Dispatch
    where
        S: MissionStore + ?Sized,
    {
        use mavlink::common::MavMessage::*;

        let mission = &mut self.mission_handler;
        match message {
            // Ground station presence, nothing to answer
            HEARTBEAT(_) => Dispatch::Handled(None),

            MISSION_CLEAR_ALL(data) => mission.handle_clear_all(header, data, store).into(),
            MISSION_COUNT(data) => mission.handle_count(header, data, armed).into(),
            MISSION_ITEM(data) => mission.handle_item(header, data, armed, store).into(),
            MISSION_ITEM_INT(data) => mission.handle_item_int(header, data, armed, store).into(),
            MISSION_REQUEST_LIST(data) => mission.handle_request_list(header, data, store).into(),
            MISSION_REQUEST(data) => mission.handle_request(header, data, store).into(),
            MISSION_REQUEST_INT(data) => mission.handle_request_int(header, data, store).into(),

            // Unhandled messages
            _ => Dispatch::Unhandled,
        }
    }

    /// Current mission upload state
    pub fn mission_state(&self) -> MissionState {
        self.mission_handler.state()
    }

    /// Drop any mission upload in progress
    pub fn reset(&mut self) {
        self.mission_handler.reset();
    }
}
