use crate::skeleton::Skeleton;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Recording state toggled by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording {
        started_at: DateTime<Utc>,
        /// Unique session ID for log correlation
        session_id: Uuid,
    },
}

/// Frames drained from a stopped session, ready for export
#[derive(Debug, Clone)]
pub struct Recording {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
    pub sample_rate_hz: u32,
    pub frames: Vec<Skeleton>,
}

/// Result of a toggle trigger
#[derive(Debug)]
pub enum ToggleOutcome {
    Started { session_id: Uuid },
    /// `None` when nothing was captured and no export should happen
    Stopped(Option<Recording>),
}

/// Append-only skeleton buffer guarded by an Idle / Recording state machine.
///
/// Frames carry no timestamps: row times are derived from the sample rate, so
/// ticks without a skeleton are compressed out of the recording.
#[derive(Debug)]
pub struct RecordingSession {
    state: SessionState,
    frames: Vec<Skeleton>,
    sample_rate_hz: u32,
}

impl RecordingSession {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            state: SessionState::Idle,
            frames: Vec::new(),
            sample_rate_hz,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, SessionState::Recording { .. })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Begin a new session. Returns `false` if one is already active.
    pub fn start(&mut self) -> bool {
        if self.is_recording() {
            debug!("Start ignored, recording already active");
            return false;
        }

        let session_id = Uuid::new_v4();
        self.frames.clear();
        self.state = SessionState::Recording {
            started_at: Utc::now(),
            session_id,
        };
        info!("Recording session {} started", session_id);
        true
    }

    /// Buffer a skeleton if recording. Returns whether it was kept.
    pub fn append(&mut self, skeleton: Skeleton) -> bool {
        if !self.is_recording() {
            return false;
        }
        self.frames.push(skeleton);
        true
    }

    /// End the session and hand over its frames.
    ///
    /// Returns `None` when idle or when no frame was captured; the buffer is
    /// released either way.
    pub fn stop(&mut self) -> Option<Recording> {
        let SessionState::Recording {
            started_at,
            session_id,
        } = self.state
        else {
            debug!("Stop ignored, no active recording");
            return None;
        };

        self.state = SessionState::Idle;
        let frames = std::mem::take(&mut self.frames);

        if frames.is_empty() {
            info!("Recording session {} stopped with no frames, nothing to export", session_id);
            return None;
        }

        info!(
            "Recording session {} stopped with {} frames",
            session_id,
            frames.len()
        );

        Some(Recording {
            session_id,
            started_at,
            stopped_at: Utc::now(),
            sample_rate_hz: self.sample_rate_hz,
            frames,
        })
    }

    /// Map the single user trigger onto start or stop
    pub fn toggle(&mut self) -> ToggleOutcome {
        if self.is_recording() {
            ToggleOutcome::Stopped(self.stop())
        } else {
            self.start();
            match self.state {
                SessionState::Recording { session_id, .. } => ToggleOutcome::Started { session_id },
                SessionState::Idle => ToggleOutcome::Stopped(None),
            }
        }
    }
}
