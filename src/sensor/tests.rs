use super::*;
use crate::error::SensorError;
use crate::skeleton::JointId;
use crate::tracking::BodyCandidate;
use std::io::Write;

const REPLAY: &str = r#"{"bodies":[{"tracking_id":72057594037928000,"is_tracked":true,"joints":[{"id":"Head","position":{"x":0.1,"y":0.6,"z":2.1},"confidence":"Tracked"}]}]}

{"bodies":null}
{"bodies":[]}
"#;

fn expect_frame(poll: FramePoll) -> SensorFrame {
    match poll {
        FramePoll::Frame(frame) => frame,
        other => panic!("expected frame, got {:?}", other),
    }
}

#[test]
fn test_replay_from_reader() {
    let mut device = ReplayDevice::from_reader(REPLAY.as_bytes(), false).unwrap();
    assert_eq!(device.tick_count(), 4);

    let first = expect_frame(device.poll_frame());
    let bodies = first.bodies.unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].tracking_id, 72057594037928000);
    assert!(bodies[0].is_tracked);
    assert_eq!(bodies[0].joints[0].id, JointId::Head);

    assert!(matches!(device.poll_frame(), FramePoll::NotReady));

    let absent = expect_frame(device.poll_frame());
    assert!(absent.bodies.is_none());

    let empty = expect_frame(device.poll_frame());
    assert_eq!(empty.bodies.unwrap().len(), 0);
    assert_eq!(empty.frame_id, 2);

    assert!(matches!(device.poll_frame(), FramePoll::Ended));
}

#[test]
fn test_replay_loops() {
    let mut device = ReplayDevice::from_reader("{\"bodies\":[]}\n".as_bytes(), true).unwrap();
    for _ in 0..3 {
        expect_frame(device.poll_frame());
    }
}

#[test]
fn test_empty_looping_replay_ends() {
    let mut device = ReplayDevice::from_reader("".as_bytes(), true).unwrap();
    assert!(matches!(device.poll_frame(), FramePoll::Ended));
}

#[test]
fn test_replay_parse_error_reports_line() {
    let result = ReplayDevice::from_reader("{\"bodies\":[]}\nnot json\n".as_bytes(), false);
    match result {
        Err(SensorError::ReplayParse { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_replay_open_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(REPLAY.as_bytes()).unwrap();

    let device = ReplayDevice::open(file.path(), false).unwrap();
    assert_eq!(device.tick_count(), 4);
}

#[test]
fn test_replay_open_missing_file() {
    let result = ReplayDevice::open("/nonexistent/replay.jsonl", false);
    assert!(matches!(result, Err(SensorError::ReplayOpen { .. })));
}

#[test]
fn test_scripted_device_sequence() {
    let mut device = ScriptedDevice::new();
    device
        .push_bodies(vec![BodyCandidate::new(1, true, Vec::new())])
        .push_not_ready()
        .push_without_bodies();
    assert_eq!(device.remaining(), 3);

    assert_eq!(expect_frame(device.poll_frame()).frame_id, 0);
    assert!(matches!(device.poll_frame(), FramePoll::NotReady));
    assert_eq!(expect_frame(device.poll_frame()).frame_id, 1);
    assert!(matches!(device.poll_frame(), FramePoll::Ended));
    assert_eq!(device.name(), "scripted");
}
