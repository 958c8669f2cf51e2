mod interface;
mod replay;
#[cfg(test)]
mod tests;

pub use interface::{CaptureDevice, FramePoll, ScriptedDevice, SensorFrame};
pub use replay::ReplayDevice;
