use super::interface::{CaptureDevice, FramePoll, SensorFrame};
use crate::error::SensorError;
use crate::tracking::BodyCandidate;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// One line of a replay file
#[derive(Debug, Deserialize)]
struct ReplayRecord {
    #[serde(default)]
    bodies: Option<Vec<BodyCandidate>>,
}

/// Plays back body frames recorded as JSON lines, one sensor frame per line.
///
/// Blank lines stand for ticks where the sensor had no new frame.
#[derive(Debug)]
pub struct ReplayDevice {
    frames: Vec<Option<Option<Vec<BodyCandidate>>>>,
    cursor: usize,
    looping: bool,
    frames_emitted: u64,
}

impl ReplayDevice {
    pub fn open<P: AsRef<Path>>(path: P, looping: bool) -> Result<Self, SensorError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SensorError::ReplayOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let device = Self::from_reader(file, looping)?;
        info!(
            "Loaded {} replay ticks from {}",
            device.frames.len(),
            path.display()
        );
        Ok(device)
    }

    pub fn from_reader<R: Read>(reader: R, looping: bool) -> Result<Self, SensorError> {
        let mut frames = Vec::new();

        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|e| SensorError::ReplayParse {
                line: line_number,
                details: e.to_string(),
            })?;

            if line.trim().is_empty() {
                frames.push(None);
                continue;
            }

            let record: ReplayRecord =
                serde_json::from_str(&line).map_err(|e| SensorError::ReplayParse {
                    line: line_number,
                    details: e.to_string(),
                })?;
            frames.push(Some(record.bodies));
        }

        Ok(Self {
            frames,
            cursor: 0,
            looping,
            frames_emitted: 0,
        })
    }

    pub fn tick_count(&self) -> usize {
        self.frames.len()
    }
}

impl CaptureDevice for ReplayDevice {
    fn poll_frame(&mut self) -> FramePoll {
        if self.cursor >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return FramePoll::Ended;
            }
            debug!("Replay reached end of input, looping");
            self.cursor = 0;
        }

        let entry = self.frames[self.cursor].clone();
        self.cursor += 1;

        match entry {
            Some(bodies) => {
                let frame = SensorFrame::new(self.frames_emitted, bodies);
                self.frames_emitted += 1;
                FramePoll::Frame(frame)
            }
            None => FramePoll::NotReady,
        }
    }

    fn name(&self) -> &str {
        "replay"
    }
}
