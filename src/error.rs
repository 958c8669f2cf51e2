use crate::skeleton::JointId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BodycapError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("System error: {message}")]
    System { message: String },
}

/// Precondition violations while building a TRC document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("Frame {frame} has {found} joints, marker set declares {expected}")]
    JointCountMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("Frame {frame} has {found} samples for {joint:?} (column {column}), expected exactly one")]
    JointSetMismatch {
        frame: usize,
        column: usize,
        joint: JointId,
        found: usize,
    },

    #[error("Joint {joint:?} is bound to more than one marker column")]
    DuplicateMarker { joint: JointId },

    #[error("Sample rate must be positive and finite, got {rate}")]
    InvalidSampleRate { rate: f64 },
}

/// Failures while handing a finished recording to its destination
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Recording could not be encoded: {0}")]
    Encode(#[from] EncodeError),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export destination was cancelled")]
    Cancelled,
}

impl ExportError {
    /// Encoding failures mean the data itself was bad; everything else is the destination
    pub fn is_encoding(&self) -> bool {
        matches!(self, ExportError::Encode(_))
    }
}

#[derive(Error, Debug)]
pub enum SensorError {
    #[error("Failed to open replay file {path}: {source}")]
    ReplayOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed replay frame on line {line}: {details}")]
    ReplayParse { line: usize, details: String },
}

impl BodycapError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BodycapError>;
