use super::collaborators::{LogNotifier, LogRenderer, Notifier, Renderer};
use super::stats::PipelineStats;
use super::types::{Notice, RenderStatus, TickOutcome};
use crate::config::BodycapConfig;
use crate::error::ExportError;
use crate::events::ControlEvent;
use crate::export::Exporter;
use crate::recording::{Recording, RecordingSession, ToggleOutcome};
use crate::sensor::{CaptureDevice, FramePoll};
use crate::skeleton::Skeleton;
use crate::tracking::{self, TrackingContext};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Single-consumer capture pipeline.
///
/// Owns the tracking context and recording session; frames and control
/// events are both applied here, one at a time.
pub struct MocapPipeline {
    device: Box<dyn CaptureDevice>,
    renderer: Box<dyn Renderer>,
    notifier: Box<dyn Notifier>,
    exporter: Exporter,
    tracking: TrackingContext,
    session: RecordingSession,
    last_skeleton: Option<Skeleton>,
    visibility_grace: Duration,
    frame_counter: u64,
    stats: PipelineStats,
}

impl MocapPipeline {
    pub fn new(config: &BodycapConfig, device: Box<dyn CaptureDevice>, exporter: Exporter) -> Self {
        info!("Creating capture pipeline with {} device", device.name());

        Self {
            device,
            renderer: Box::new(LogRenderer::default()),
            notifier: Box::new(LogNotifier),
            exporter,
            tracking: TrackingContext::new(),
            session: RecordingSession::new(config.recording.sample_rate_hz),
            last_skeleton: None,
            visibility_grace: config.visibility_grace(),
            frame_counter: 0,
            stats: PipelineStats::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    pub fn tracking(&self) -> &TrackingContext {
        &self.tracking
    }

    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    /// Poll the device once and push the result through selection, recording and rendering
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let outcome = match self.device.poll_frame() {
            FramePoll::Ended => return TickOutcome::Ended,
            FramePoll::NotReady => {
                self.stats.record_skip();
                TickOutcome::Skipped
            }
            FramePoll::Frame(frame) => {
                self.frame_counter += 1;
                self.stats.record_frame();

                match frame.bodies {
                    None => {
                        debug!("Frame {} carried no body data", frame.frame_id);
                        self.stats.record_skip();
                        TickOutcome::Skipped
                    }
                    Some(bodies) => match tracking::select(&bodies, &mut self.tracking, now) {
                        Some(skeleton) => {
                            let recorded = self.session.append(skeleton.clone());
                            self.stats.record_selection(recorded);
                            self.last_skeleton = Some(skeleton);
                            TickOutcome::Tracked
                        }
                        None => {
                            self.stats.record_loss();
                            TickOutcome::Lost
                        }
                    },
                }
            }
        };

        self.render(now);
        outcome
    }

    fn render(&mut self, now: Instant) {
        let skeleton = if self.tracking.is_visible(now, self.visibility_grace) {
            self.last_skeleton.as_ref()
        } else {
            None
        };

        let status = RenderStatus {
            skeleton,
            is_recording: self.session.is_recording(),
            frame_counter: self.frame_counter,
            recorded_frames: self.session.frame_count(),
        };
        self.renderer.render(&status);
    }

    /// Apply a control event. Returns `false` once the loop should stop.
    pub async fn handle_control(&mut self, event: ControlEvent) -> bool {
        debug!("Handling control event: {}", event.description());

        match event {
            ControlEvent::ToggleRecording { .. } => {
                match self.session.toggle() {
                    ToggleOutcome::Started { .. } => self.notifier.notify(Notice::RecordingStarted),
                    ToggleOutcome::Stopped(Some(recording)) => self.export(recording).await,
                    ToggleOutcome::Stopped(None) => self.notifier.notify(Notice::NothingRecorded),
                }
                true
            }
            ControlEvent::Shutdown { reason, .. } => {
                info!("Stopping capture pipeline: {}", reason);
                false
            }
        }
    }

    /// Begin recording unless already recording
    pub fn start_recording(&mut self) {
        if self.session.start() {
            self.notifier.notify(Notice::RecordingStarted);
        }
    }

    /// Flush an active recording before the loop exits
    pub async fn finish(&mut self) {
        if !self.session.is_recording() {
            return;
        }

        info!("Capture ending with an active recording, exporting it");
        match self.session.stop() {
            Some(recording) => self.export(recording).await,
            None => self.notifier.notify(Notice::NothingRecorded),
        }
    }

    async fn export(&mut self, recording: Recording) {
        let frames = recording.frames.len();

        let notice = match self.exporter.export(&recording).await {
            Ok(path) => Notice::Exported { path, frames },
            Err(ExportError::Cancelled) => Notice::ExportCancelled,
            Err(e) if e.is_encoding() => {
                warn!("Encoding failed for recording {}: {}", recording.session_id, e);
                Notice::EncodingFailed {
                    details: e.to_string(),
                }
            }
            Err(e) => {
                warn!("Writing recording {} failed: {}", recording.session_id, e);
                Notice::WriteFailed {
                    details: e.to_string(),
                }
            }
        };

        self.stats
            .record_export(matches!(notice, Notice::Exported { .. }));
        self.notifier.notify(notice);
    }
}
