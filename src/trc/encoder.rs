use super::format::{format_significant, SIGNIFICANT_DIGITS};
use crate::error::EncodeError;
use crate::skeleton::{MarkerSet, Skeleton};
use tracing::debug;

const FILE_TYPE_TAG: &str = "PathFileType";
const FILE_TYPE_VERSION: u32 = 4;
const COORDINATE_TOKEN: &str = "(X/Y/Z)";
const UNITS: &str = "mm";
const METERS_TO_MILLIMETERS: f64 = 1000.0;

const HEADER_FIELDS: [&str; 8] = [
    "DataRate",
    "CameraRate",
    "NumFrames",
    "NumMarkers",
    "Units",
    "OrigDataRate",
    "OrigDataStartFrame",
    "OrigNumFrames",
];

/// Serializes recorded skeletons into a tab-separated TRC document
#[derive(Debug, Clone)]
pub struct TrcEncoder {
    markers: MarkerSet,
    sample_rate_hz: u32,
    file_name: String,
}

impl TrcEncoder {
    /// Encoder for sensor-space positions in meters, always written as millimeters
    pub fn new(markers: MarkerSet, sample_rate_hz: u32) -> Self {
        Self {
            markers,
            sample_rate_hz,
            file_name: "motion.trc".to_string(),
        }
    }

    /// Name written in the first header line
    pub fn with_file_name<S: Into<String>>(mut self, file_name: S) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Encode every frame, or nothing at all if any frame violates the marker set
    pub fn encode(&self, frames: &[Skeleton]) -> Result<Vec<u8>, EncodeError> {
        self.validate(frames)?;

        let mut out = String::new();
        self.write_header(&mut out, frames.len());
        for (index, skeleton) in frames.iter().enumerate() {
            self.write_row(&mut out, index, skeleton);
        }

        debug!(
            "Encoded {} frames x {} markers into {} bytes",
            frames.len(),
            self.markers.len(),
            out.len()
        );
        Ok(out.into_bytes())
    }

    fn validate(&self, frames: &[Skeleton]) -> Result<(), EncodeError> {
        if self.sample_rate_hz == 0 {
            return Err(EncodeError::InvalidSampleRate {
                rate: self.sample_rate_hz as f64,
            });
        }

        if let Some(joint) = self.markers.duplicate_joint() {
            return Err(EncodeError::DuplicateMarker { joint });
        }

        let expected = self.markers.len();
        for (frame, skeleton) in frames.iter().enumerate() {
            if skeleton.joint_count() != expected {
                return Err(EncodeError::JointCountMismatch {
                    frame,
                    expected,
                    found: skeleton.joint_count(),
                });
            }

            // Equal counts plus one sample per column leaves no stray joints
            for (column, marker) in self.markers.markers().iter().enumerate() {
                let found = skeleton.count_of(marker.joint);
                if found != 1 {
                    return Err(EncodeError::JointSetMismatch {
                        frame,
                        column,
                        joint: marker.joint,
                        found,
                    });
                }
            }
        }
        Ok(())
    }

    fn write_header(&self, out: &mut String, frame_count: usize) {
        let rate = self.sample_rate_hz.to_string();
        let marker_count = self.markers.len();

        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            FILE_TYPE_TAG, FILE_TYPE_VERSION, COORDINATE_TOKEN, self.file_name
        ));

        out.push_str(&HEADER_FIELDS.join("\t"));
        out.push('\n');

        out.push_str(&format!(
            "{rate}\t{rate}\t{frames}\t{markers}\t{units}\t{rate}\t0\t{frames}\n",
            rate = rate,
            frames = frame_count,
            markers = marker_count,
            units = UNITS,
        ));

        // Each label sits over the X column of its 3-wide block
        out.push_str("Frame#\tTime");
        for label in self.markers.labels() {
            out.push('\t');
            out.push_str(label);
            out.push_str("\t\t");
        }
        out.push('\n');

        out.push('\t');
        for n in 1..=marker_count {
            out.push_str(&format!("\tX{n}\tY{n}\tZ{n}", n = n));
        }
        out.push('\n');
    }

    fn write_row(&self, out: &mut String, index: usize, skeleton: &Skeleton) {
        let time = index as f64 / self.sample_rate_hz as f64;

        out.push_str(&index.to_string());
        out.push('\t');
        out.push_str(&format_significant(time, SIGNIFICANT_DIGITS));

        for sample in self
            .markers
            .markers()
            .iter()
            .filter_map(|marker| skeleton.get(marker.joint))
        {
            let position = sample.position.scaled(METERS_TO_MILLIMETERS);
            for value in [position.x, position.y, position.z] {
                out.push('\t');
                out.push_str(&format_significant(value, SIGNIFICANT_DIGITS));
            }
        }
        out.push('\n');
    }
}
