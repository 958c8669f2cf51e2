pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod keyboard_input;
pub mod recording;
pub mod sensor;
pub mod skeleton;
pub mod tracking;
pub mod trc;

pub use app::{MocapPipeline, Notice, PipelineStats, TickOutcome};
pub use config::BodycapConfig;
pub use error::{BodycapError, EncodeError, ExportError, Result, SensorError};
pub use events::{control_channel, ControlEvent, ControlSender};
pub use export::{DirectoryTarget, ExportTarget, Exporter};
pub use keyboard_input::KeyboardInputHandler;
pub use recording::{Recording, RecordingSession, SessionState, ToggleOutcome};
pub use sensor::{CaptureDevice, FramePoll, ReplayDevice, ScriptedDevice, SensorFrame};
pub use skeleton::{JointId, JointSample, Marker, MarkerSet, Position, Skeleton, TrackingConfidence};
pub use tracking::{select, BodyCandidate, TrackingContext};
pub use trc::TrcEncoder;
