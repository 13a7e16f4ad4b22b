//! Mission upload and download driven through the link with real frames

mod common;

use autopilot_link::communication::mavlink::handlers::MissionState;
use autopilot_link::communication::mavlink::state::VehicleState;
use autopilot_link::communication::mavlink::{MavlinkTelemetry, TelemetryConfig};
use autopilot_link_core::mission::{MissionList, MissionStore, WaypointAction, MAX_WAYPOINTS};
use autopilot_link_core::scheduler::StreamRates;
use autopilot_link_core::traits::MockTime;
use common::Loopback;
use mavlink::common::{
    MavCmd, MavFrame, MavMessage, MavMissionResult, MISSION_CLEAR_ALL_DATA, MISSION_COUNT_DATA,
    MISSION_ITEM_DATA, MISSION_ITEM_INT_DATA, MISSION_REQUEST_DATA, MISSION_REQUEST_INT_DATA,
    MISSION_REQUEST_LIST_DATA,
};

struct Vehicle {
    // Streams disabled, so only replies come back
    link: MavlinkTelemetry<Loopback>,
    clock: MockTime,
    state: VehicleState,
    mission: MissionList,
}

impl Vehicle {
    fn new() -> Self {
        let config = TelemetryConfig {
            rates: StreamRates::disabled(),
            ..Default::default()
        };
        let mut link = MavlinkTelemetry::new(config);
        link.attach(Loopback::new());
        Self {
            link,
            clock: MockTime::new(),
            state: VehicleState::new(),
            mission: MissionList::new(),
        }
    }

    /// Send one message and collect the replies of one tick
    fn exchange(&mut self, message: MavMessage) -> Vec<MavMessage> {
        self.link.transport_mut().unwrap().send(&message);
        self.link.tick(&self.clock, &self.state, &mut self.mission);
        self.link
            .transport_mut()
            .unwrap()
            .receive()
            .into_iter()
            .map(|(header, reply)| {
                assert_eq!(header.system_id, 1);
                assert_eq!(header.component_id, 250);
                reply
            })
            .collect()
    }

    fn reply(&mut self, message: MavMessage) -> MavMessage {
        let mut replies = self.exchange(message);
        assert_eq!(replies.len(), 1, "expected a single reply");
        replies.remove(0)
    }
}

fn count(n: u16) -> MavMessage {
    MavMessage::MISSION_COUNT(MISSION_COUNT_DATA {
        target_system: 1,
        target_component: 1,
        count: n,
        ..Default::default()
    })
}

fn item(seq: u16, lat: f32, lon: f32, alt: f32) -> MavMessage {
    MavMessage::MISSION_ITEM(MISSION_ITEM_DATA {
        target_system: 1,
        target_component: 1,
        seq,
        frame: MavFrame::MAV_FRAME_GLOBAL_RELATIVE_ALT,
        command: MavCmd::MAV_CMD_NAV_WAYPOINT,
        autocontinue: 1,
        x: lat,
        y: lon,
        z: alt,
        ..Default::default()
    })
}

fn simple_item(seq: u16) -> MavMessage {
    item(seq, 47.397_742, 8.545_594, 25.0 + f32::from(seq))
}

fn expect_request(reply: MavMessage) -> u16 {
    match reply {
        MavMessage::MISSION_REQUEST(data) => {
            assert_eq!(data.target_system, 255);
            assert_eq!(data.target_component, 190);
            data.seq
        }
        other => panic!("expected MISSION_REQUEST, got {:?}", other),
    }
}

fn expect_ack(reply: MavMessage) -> MavMissionResult {
    match reply {
        MavMessage::MISSION_ACK(data) => {
            assert_eq!(data.target_system, 255);
            assert_eq!(data.target_component, 190);
            data.mavtype
        }
        other => panic!("expected MISSION_ACK, got {:?}", other),
    }
}

#[test]
fn upload_with_out_of_sequence_retry() {
    let mut vehicle = Vehicle::new();

    assert_eq!(expect_request(vehicle.reply(count(3))), 0);
    assert_eq!(expect_request(vehicle.reply(simple_item(0))), 1);
    assert_eq!(
        expect_ack(vehicle.reply(simple_item(2))),
        MavMissionResult::MAV_MISSION_INVALID_SEQUENCE
    );
    assert_eq!(
        vehicle.link.mission_state(),
        MissionState::AwaitingItem {
            expected: 1,
            count: 3
        }
    );
    assert_eq!(expect_request(vehicle.reply(simple_item(1))), 2);
    assert_eq!(
        expect_ack(vehicle.reply(simple_item(2))),
        MavMissionResult::MAV_MISSION_ACCEPTED
    );

    assert_eq!(vehicle.link.mission_state(), MissionState::Idle);
    assert_eq!(vehicle.mission.count(), 3);
    assert!(vehicle.mission.waypoint(2).unwrap().is_last());
    assert!(!vehicle.mission.waypoint(1).unwrap().is_last());
}

#[test]
fn oversized_count_while_armed() {
    let mut vehicle = Vehicle::new();
    vehicle.state.status.armed = true;

    let reply = vehicle.reply(count(MAX_WAYPOINTS as u16 + 1));
    assert_eq!(expect_ack(reply), MavMissionResult::MAV_MISSION_ERROR);
    assert_eq!(vehicle.link.mission_state(), MissionState::Idle);
}

#[test]
fn oversized_count_while_disarmed() {
    let mut vehicle = Vehicle::new();

    let reply = vehicle.reply(count(MAX_WAYPOINTS as u16 + 1));
    assert_eq!(expect_ack(reply), MavMissionResult::MAV_MISSION_NO_SPACE);
}

#[test]
fn full_capacity_upload() {
    let mut vehicle = Vehicle::new();
    let n = MAX_WAYPOINTS as u16;

    assert_eq!(expect_request(vehicle.reply(count(n))), 0);
    for seq in 0..n - 1 {
        assert_eq!(expect_request(vehicle.reply(simple_item(seq))), seq + 1);
    }
    assert_eq!(
        expect_ack(vehicle.reply(simple_item(n - 1))),
        MavMissionResult::MAV_MISSION_ACCEPTED
    );
    assert_eq!(vehicle.mission.count(), n);
}

#[test]
fn upload_then_download_round_trip() {
    let mut vehicle = Vehicle::new();
    let points = [
        (47.397_742_f32, 8.545_594_f32, 30.0_f32),
        (-33.868_820, 151.209_290, 12.5),
        (0.000_1, -0.000_1, 100.25),
    ];

    vehicle.reply(count(points.len() as u16));
    for (seq, (lat, lon, alt)) in points.iter().enumerate() {
        vehicle.reply(item(seq as u16, *lat, *lon, *alt));
    }
    assert_eq!(vehicle.mission.count(), 3);

    match vehicle.reply(MavMessage::MISSION_REQUEST_LIST(MISSION_REQUEST_LIST_DATA {
        target_system: 1,
        target_component: 1,
        ..Default::default()
    })) {
        MavMessage::MISSION_COUNT(data) => assert_eq!(data.count, 3),
        other => panic!("expected MISSION_COUNT, got {:?}", other),
    }

    for (seq, (lat, lon, alt)) in points.iter().enumerate() {
        let request = MavMessage::MISSION_REQUEST(MISSION_REQUEST_DATA {
            target_system: 1,
            target_component: 1,
            seq: seq as u16,
            ..Default::default()
        });
        match vehicle.reply(request) {
            MavMessage::MISSION_ITEM(data) => {
                assert_eq!(data.seq, seq as u16);
                assert_eq!(data.frame, MavFrame::MAV_FRAME_GLOBAL_RELATIVE_ALT);
                assert_eq!(data.command, MavCmd::MAV_CMD_NAV_WAYPOINT);
                assert_eq!(data.autocontinue, 1);
                assert!((data.x - lat).abs() < 1e-5, "lat {} vs {}", data.x, lat);
                assert!((data.y - lon).abs() < 1e-5, "lon {} vs {}", data.y, lon);
                assert!((data.z - alt).abs() < 0.01, "alt {} vs {}", data.z, alt);
            }
            other => panic!("expected MISSION_ITEM, got {:?}", other),
        }
    }
}

#[test]
fn int_items_round_trip_exactly() {
    let mut vehicle = Vehicle::new();

    vehicle.reply(count(2));
    let first = MavMessage::MISSION_ITEM_INT(MISSION_ITEM_INT_DATA {
        target_system: 1,
        target_component: 1,
        seq: 0,
        frame: MavFrame::MAV_FRAME_GLOBAL_RELATIVE_ALT,
        command: MavCmd::MAV_CMD_NAV_WAYPOINT,
        autocontinue: 1,
        x: 473_977_421,
        y: 85_455_939,
        z: 40.0,
        ..Default::default()
    });
    assert_eq!(expect_request(vehicle.reply(first)), 1);

    let rth = MavMessage::MISSION_ITEM_INT(MISSION_ITEM_INT_DATA {
        target_system: 1,
        target_component: 1,
        seq: 1,
        frame: MavFrame::MAV_FRAME_MISSION,
        command: MavCmd::MAV_CMD_NAV_RETURN_TO_LAUNCH,
        autocontinue: 1,
        ..Default::default()
    });
    assert_eq!(
        expect_ack(vehicle.reply(rth)),
        MavMissionResult::MAV_MISSION_ACCEPTED
    );
    assert_eq!(vehicle.mission.waypoint(1).unwrap().action, WaypointAction::Rth);

    let request = |seq| {
        MavMessage::MISSION_REQUEST_INT(MISSION_REQUEST_INT_DATA {
            target_system: 1,
            target_component: 1,
            seq,
            ..Default::default()
        })
    };
    match vehicle.reply(request(0)) {
        MavMessage::MISSION_ITEM_INT(data) => {
            assert_eq!(data.x, 473_977_421);
            assert_eq!(data.y, 85_455_939);
        }
        other => panic!("expected MISSION_ITEM_INT, got {:?}", other),
    }
    match vehicle.reply(request(1)) {
        MavMessage::MISSION_ITEM_INT(data) => {
            assert_eq!(data.frame, MavFrame::MAV_FRAME_MISSION);
            assert_eq!(data.command, MavCmd::MAV_CMD_NAV_RETURN_TO_LAUNCH);
        }
        other => panic!("expected MISSION_ITEM_INT, got {:?}", other),
    }
    assert_eq!(
        expect_ack(vehicle.reply(request(2))),
        MavMissionResult::MAV_MISSION_INVALID_SEQUENCE
    );
}

#[test]
fn armed_vehicle_refuses_uploaded_items() {
    let mut vehicle = Vehicle::new();
    vehicle.reply(count(1));
    vehicle.reply(simple_item(0));
    let before = vehicle.mission.waypoint(0);

    vehicle.state.status.armed = true;
    assert_eq!(expect_request(vehicle.reply(count(1))), 0);
    assert_eq!(
        expect_ack(vehicle.reply(simple_item(0))),
        MavMissionResult::MAV_MISSION_ERROR
    );
    assert_eq!(vehicle.mission.waypoint(0), before);
}

#[test]
fn clear_all_empties_the_list_even_when_armed() {
    let mut vehicle = Vehicle::new();
    vehicle.reply(count(2));
    vehicle.reply(simple_item(0));
    vehicle.reply(simple_item(1));
    vehicle.reply(count(3));

    vehicle.state.status.armed = true;
    let clear = MavMessage::MISSION_CLEAR_ALL(MISSION_CLEAR_ALL_DATA {
        target_system: 1,
        target_component: 1,
        ..Default::default()
    });
    assert_eq!(
        expect_ack(vehicle.reply(clear)),
        MavMissionResult::MAV_MISSION_ACCEPTED
    );
    assert!(vehicle.mission.is_empty());
    assert_eq!(vehicle.link.mission_state(), MissionState::Idle);
}

#[test]
fn zero_count_requests_item_zero() {
    let mut vehicle = Vehicle::new();
    vehicle.reply(count(1));
    vehicle.reply(simple_item(0));

    assert_eq!(expect_request(vehicle.reply(count(0))), 0);
    assert_eq!(
        vehicle.link.mission_state(),
        MissionState::AwaitingItem {
            expected: 0,
            count: 0
        }
    );
    assert_eq!(vehicle.mission.count(), 1);
}

#[test]
fn messages_for_other_systems_get_no_reply() {
    let mut vehicle = Vehicle::new();
    let elsewhere = MavMessage::MISSION_COUNT(MISSION_COUNT_DATA {
        target_system: 9,
        target_component: 1,
        count: 2,
        ..Default::default()
    });

    assert!(vehicle.exchange(elsewhere).is_empty());
    assert_eq!(vehicle.link.mission_state(), MissionState::Idle);
}

#[test]
fn stalled_upload_waits_indefinitely() {
    let mut vehicle = Vehicle::new();
    vehicle.reply(count(4));
    vehicle.reply(simple_item(0));

    // No session timeout: an hour of silence changes nothing
    for _ in 0..100 {
        vehicle.clock.advance(36_000_000);
        vehicle.link.tick(&vehicle.clock, &vehicle.state, &mut vehicle.mission);
    }
    assert_eq!(
        vehicle.link.mission_state(),
        MissionState::AwaitingItem {
            expected: 1,
            count: 4
        }
    );
    assert_eq!(expect_request(vehicle.reply(simple_item(1))), 2);
}

#[test]
fn corrupted_frame_is_dropped_and_link_recovers() {
    let mut vehicle = Vehicle::new();
    let mut buf = std::io::Cursor::new(Vec::new());
    mavlink::write_v2_msg(&mut buf, common::GCS, &count(2)).unwrap();
    let mut garbage = buf.into_inner();
    let crc = garbage.len() - 1;
    garbage[crc] ^= 0x5A;
    vehicle.link.transport_mut().unwrap().send_raw(&garbage);

    assert_eq!(vehicle.exchange(count(2)).len(), 1);
    assert_eq!(vehicle.link.parser_stats().parse_errors, 1);
    assert_eq!(
        vehicle.link.mission_state(),
        MissionState::AwaitingItem {
            expected: 0,
            count: 2
        }
    );
}
