use crate::tracking::BodyCandidate;
use std::collections::VecDeque;
use std::time::SystemTime;

/// One multi-source frame from the depth sensor
#[derive(Debug, Clone)]
pub struct SensorFrame {
    pub frame_id: u64,
    pub timestamp: SystemTime,
    /// `None` when the body stream had no data for this frame
    pub bodies: Option<Vec<BodyCandidate>>,
}

impl SensorFrame {
    pub fn new(frame_id: u64, bodies: Option<Vec<BodyCandidate>>) -> Self {
        Self {
            frame_id,
            timestamp: SystemTime::now(),
            bodies,
        }
    }
}

/// Result of asking the device for its next frame
#[derive(Debug, Clone)]
pub enum FramePoll {
    Frame(SensorFrame),
    /// Nothing new since the last poll; the tick is skipped
    NotReady,
    /// The source has no more frames
    Ended,
}

/// Source of body frames driven by the capture loop
pub trait CaptureDevice: Send {
    /// Non-blocking poll for the latest frame
    fn poll_frame(&mut self) -> FramePoll;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Device that plays back a fixed sequence of polls, then ends
#[derive(Debug, Default)]
pub struct ScriptedDevice {
    polls: VecDeque<FramePoll>,
    next_frame_id: u64,
}

impl ScriptedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame carrying these bodies
    pub fn push_bodies(&mut self, bodies: Vec<BodyCandidate>) -> &mut Self {
        let frame = SensorFrame::new(self.next_frame_id, Some(bodies));
        self.next_frame_id += 1;
        self.polls.push_back(FramePoll::Frame(frame));
        self
    }

    /// Queue a frame whose body stream is missing
    pub fn push_without_bodies(&mut self) -> &mut Self {
        let frame = SensorFrame::new(self.next_frame_id, None);
        self.next_frame_id += 1;
        self.polls.push_back(FramePoll::Frame(frame));
        self
    }

    pub fn push_not_ready(&mut self) -> &mut Self {
        self.polls.push_back(FramePoll::NotReady);
        self
    }

    pub fn remaining(&self) -> usize {
        self.polls.len()
    }
}

impl CaptureDevice for ScriptedDevice {
    fn poll_frame(&mut self) -> FramePoll {
        self.polls.pop_front().unwrap_or(FramePoll::Ended)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
