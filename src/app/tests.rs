use super::*;
use crate::config::BodycapConfig;
use crate::events::{control_channel, ControlEvent};
use crate::export::{DirectoryTarget, Exporter, ExportTarget};
use crate::recording::Recording;
use crate::sensor::ScriptedDevice;
use crate::skeleton::{JointId, JointSample, MarkerSet, Position, TrackingConfidence};
use crate::tracking::BodyCandidate;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Clone, Default)]
struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

#[derive(Clone, Default)]
struct FrameLog {
    /// (skeleton shown, recording flag) per rendered tick
    frames: Arc<Mutex<Vec<(bool, bool)>>>,
}

impl Renderer for FrameLog {
    fn render(&mut self, status: &RenderStatus<'_>) {
        self.frames
            .lock()
            .unwrap()
            .push((status.skeleton.is_some(), status.is_recording));
    }
}

struct CancelledTarget;

impl ExportTarget for CancelledTarget {
    fn destination(&mut self, _recording: &Recording) -> Option<PathBuf> {
        None
    }
}

fn full_body(tracking_id: u64, is_tracked: bool) -> BodyCandidate {
    let joints = JointId::ALL
        .iter()
        .map(|(id, _)| {
            JointSample::new(
                *id,
                Position::new(tracking_id as f64, 1.0, 2.0),
                TrackingConfidence::Tracked,
            )
        })
        .collect();
    BodyCandidate::new(tracking_id, is_tracked, joints)
}

fn pipeline_with(
    device: ScriptedDevice,
    target: Box<dyn ExportTarget>,
) -> (MocapPipeline, RecordingNotifier, FrameLog) {
    let config = BodycapConfig::default();
    let notifier = RecordingNotifier::default();
    let frames = FrameLog::default();
    let exporter = Exporter::new(target, MarkerSet::sensor_joints());

    let pipeline = MocapPipeline::new(&config, Box::new(device), exporter)
        .with_notifier(Box::new(notifier.clone()))
        .with_renderer(Box::new(frames.clone()));
    (pipeline, notifier, frames)
}

fn exported_path(notifier: &RecordingNotifier) -> PathBuf {
    let notices = notifier.notices.lock().unwrap();
    notices
        .iter()
        .find_map(|notice| match notice {
            Notice::Exported { path, .. } => Some(path.clone()),
            _ => None,
        })
        .expect("no export notice")
}

#[tokio::test]
async fn test_recording_skips_lost_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut device = ScriptedDevice::new();
    device
        .push_bodies(vec![full_body(1, true)])
        .push_bodies(vec![])
        .push_bodies(vec![full_body(1, false)])
        .push_without_bodies()
        .push_not_ready()
        .push_bodies(vec![full_body(2, true), full_body(1, true)]);

    let (mut pipeline, notifier, _) =
        pipeline_with(device, Box::new(DirectoryTarget::new(dir.path(), "take")));
    pipeline.handle_control(ControlEvent::toggle()).await;

    let start = Instant::now();
    let outcomes: Vec<TickOutcome> = (0..7)
        .map(|i| pipeline.tick(start + Duration::from_millis(33 * i)))
        .collect();

    assert_eq!(
        outcomes,
        vec![
            TickOutcome::Tracked,
            TickOutcome::Lost,
            TickOutcome::Lost,
            TickOutcome::Skipped,
            TickOutcome::Skipped,
            TickOutcome::Tracked,
            TickOutcome::Ended,
        ]
    );
    assert_eq!(pipeline.session().frame_count(), 2);
    assert_eq!(pipeline.tracking().current_identity(), Some(1));

    pipeline.handle_control(ControlEvent::toggle()).await;

    let contents = std::fs::read_to_string(exported_path(&notifier)).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5 + 2);
    assert_eq!(lines[2], "30\t30\t2\t25\tmm\t30\t0\t2");
    assert!(lines[6].starts_with("1\t0.033333\t1000\t1000\t2000\t"));
    assert_eq!(pipeline.stats().recordings_exported, 1);
}

#[tokio::test]
async fn test_stop_with_no_frames_does_not_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut device = ScriptedDevice::new();
    for _ in 0..10 {
        device.push_bodies(vec![]);
    }

    let (mut pipeline, notifier, _) =
        pipeline_with(device, Box::new(DirectoryTarget::new(dir.path(), "take")));
    pipeline.handle_control(ControlEvent::toggle()).await;
    for _ in 0..10 {
        assert_eq!(pipeline.tick(Instant::now()), TickOutcome::Lost);
    }
    assert_eq!(pipeline.session().frame_count(), 0);

    pipeline.handle_control(ControlEvent::toggle()).await;

    assert_eq!(
        *notifier.notices.lock().unwrap(),
        vec![Notice::RecordingStarted, Notice::NothingRecorded]
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(pipeline.stats().recordings_exported, 0);
}

#[tokio::test]
async fn test_frames_outside_recording_are_not_buffered() {
    let mut device = ScriptedDevice::new();
    device.push_bodies(vec![full_body(4, true)]);

    let (mut pipeline, _, _) = pipeline_with(device, Box::new(CancelledTarget));
    assert_eq!(pipeline.tick(Instant::now()), TickOutcome::Tracked);

    assert_eq!(pipeline.session().frame_count(), 0);
    assert_eq!(pipeline.stats().skeletons_selected, 1);
    assert_eq!(pipeline.stats().frames_recorded, 0);
}

#[tokio::test]
async fn test_cancelled_export_discards_recording() {
    let mut device = ScriptedDevice::new();
    device.push_bodies(vec![full_body(4, true)]);

    let (mut pipeline, notifier, _) = pipeline_with(device, Box::new(CancelledTarget));
    pipeline.handle_control(ControlEvent::toggle()).await;
    pipeline.tick(Instant::now());
    pipeline.handle_control(ControlEvent::toggle()).await;

    assert_eq!(
        notifier.notices.lock().unwrap().last(),
        Some(&Notice::ExportCancelled)
    );
    assert!(!pipeline.session().is_recording());
    assert_eq!(pipeline.session().frame_count(), 0);
    assert_eq!(pipeline.stats().export_failures, 1);
}

#[tokio::test]
async fn test_encoding_failure_is_reported_distinctly() {
    let dir = tempfile::tempdir().unwrap();
    let partial = BodyCandidate::new(
        9,
        true,
        vec![JointSample::new(
            JointId::Head,
            Position::new(0.0, 1.7, 2.0),
            TrackingConfidence::Tracked,
        )],
    );
    let mut device = ScriptedDevice::new();
    device.push_bodies(vec![partial]);

    let (mut pipeline, notifier, _) =
        pipeline_with(device, Box::new(DirectoryTarget::new(dir.path(), "take")));
    pipeline.handle_control(ControlEvent::toggle()).await;
    pipeline.tick(Instant::now());
    assert!(pipeline.handle_control(ControlEvent::toggle()).await);

    let notices = notifier.notices.lock().unwrap();
    assert!(matches!(notices.last(), Some(Notice::EncodingFailed { .. })));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_overlay_hidden_after_grace_window() {
    let mut device = ScriptedDevice::new();
    device
        .push_bodies(vec![full_body(1, true)])
        .push_bodies(vec![])
        .push_bodies(vec![]);

    let (mut pipeline, _, frames) = pipeline_with(device, Box::new(CancelledTarget));
    let start = Instant::now();
    pipeline.tick(start);
    pipeline.tick(start + Duration::from_millis(200));
    pipeline.tick(start + Duration::from_millis(600));

    assert_eq!(
        *frames.frames.lock().unwrap(),
        vec![(true, false), (true, false), (false, false)]
    );
}

#[tokio::test]
async fn test_shutdown_stops_handling() {
    let (mut pipeline, _, _) = pipeline_with(ScriptedDevice::new(), Box::new(CancelledTarget));
    assert!(!pipeline.handle_control(ControlEvent::shutdown("test")).await);
}

#[tokio::test]
async fn test_run_exports_active_recording_at_end_of_stream() {
    let dir = tempfile::tempdir().unwrap();
    let mut device = ScriptedDevice::new();
    for id in 0..5 {
        device.push_bodies(vec![full_body(id % 2, true)]);
    }

    let (mut pipeline, notifier, _) =
        pipeline_with(device, Box::new(DirectoryTarget::new(dir.path(), "take")));
    pipeline.start_recording();

    let (_sender, receiver) = control_channel(4);
    let stats = pipeline
        .run(receiver, Duration::from_millis(1), CancellationToken::new())
        .await;

    assert_eq!(stats.frames_received, 5);
    assert_eq!(stats.frames_recorded, 5);
    assert_eq!(stats.recordings_exported, 1);

    let contents = std::fs::read_to_string(exported_path(&notifier)).unwrap();
    assert_eq!(contents.lines().count(), 5 + 5);
}

#[tokio::test]
async fn test_run_processes_control_events() {
    let mut device = ScriptedDevice::new();
    for _ in 0..1000 {
        device.push_not_ready();
    }

    let (pipeline, notifier, _) = pipeline_with(device, Box::new(CancelledTarget));
    let (sender, receiver) = control_channel(4);
    sender.send(ControlEvent::toggle()).await.unwrap();
    sender.send(ControlEvent::toggle()).await.unwrap();
    sender.send(ControlEvent::shutdown("test")).await.unwrap();

    let stats = pipeline
        .run(receiver, Duration::from_secs(60), CancellationToken::new())
        .await;

    assert_eq!(stats.recordings_exported, 0);
    assert_eq!(
        *notifier.notices.lock().unwrap(),
        vec![Notice::RecordingStarted, Notice::NothingRecorded]
    );
}

#[tokio::test]
async fn test_run_honors_cancellation() {
    let mut device = ScriptedDevice::new();
    device.push_not_ready();

    let (pipeline, _, _) = pipeline_with(device, Box::new(CancelledTarget));
    let (_sender, receiver) = control_channel(4);
    let token = CancellationToken::new();
    token.cancel();

    let stats = pipeline.run(receiver, Duration::from_secs(60), token).await;
    assert_eq!(stats.frames_received, 0);
}

#[tokio::test]
async fn test_repeated_joint_ids_fail_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let repeated = BodyCandidate::new(
        4,
        true,
        (0..JointId::COUNT)
            .map(|i| {
                JointSample::new(
                    JointId::Head,
                    Position::new(i as f64, 0.0, 0.0),
                    TrackingConfidence::Tracked,
                )
            })
            .collect(),
    );
    let mut device = ScriptedDevice::new();
    device.push_bodies(vec![repeated]);

    let (mut pipeline, notifier, _) =
        pipeline_with(device, Box::new(DirectoryTarget::new(dir.path(), "take")));
    pipeline.handle_control(ControlEvent::toggle()).await;
    pipeline.tick(Instant::now());
    pipeline.handle_control(ControlEvent::toggle()).await;

    let notices = notifier.notices.lock().unwrap();
    match notices.last() {
        Some(Notice::EncodingFailed { details }) => assert!(details.contains("SpineBase")),
        other => panic!("unexpected notice: {:?}", other),
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
