use crate::skeleton::Skeleton;
use std::path::PathBuf;

/// What a single capture tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame arrived and a body was selected
    Tracked,
    /// A frame arrived without any tracked body
    Lost,
    /// No frame or no body data this tick
    Skipped,
    /// The capture device has no more frames
    Ended,
}

/// User-facing notifications raised by the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    RecordingStarted,
    /// Recording stopped before any skeleton was captured
    NothingRecorded,
    Exported { path: PathBuf, frames: usize },
    ExportCancelled,
    /// The recorded data could not be encoded
    EncodingFailed { details: String },
    /// The encoded file could not be written
    WriteFailed { details: String },
}

/// Everything the overlay renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderStatus<'a> {
    /// Latest skeleton, only while it is still considered visible
    pub skeleton: Option<&'a Skeleton>,
    pub is_recording: bool,
    pub frame_counter: u64,
    pub recorded_frames: usize,
}

impl RenderStatus<'_> {
    pub fn status_line(&self) -> Option<&'static str> {
        self.is_recording
            .then_some("Recording, press SPACE to stop...")
    }
}
