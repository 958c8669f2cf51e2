use crate::error::{BodycapError, Result};
use std::time::SystemTime;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// User-driven control events consumed by the capture loop
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Start recording when idle, stop and export when recording
    ToggleRecording { timestamp: SystemTime },
    /// Stop the capture loop
    Shutdown {
        timestamp: SystemTime,
        reason: String,
    },
}

impl ControlEvent {
    pub fn toggle() -> Self {
        ControlEvent::ToggleRecording {
            timestamp: SystemTime::now(),
        }
    }

    pub fn shutdown<S: Into<String>>(reason: S) -> Self {
        ControlEvent::Shutdown {
            timestamp: SystemTime::now(),
            reason: reason.into(),
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            ControlEvent::ToggleRecording { .. } => "Recording toggle requested".to_string(),
            ControlEvent::Shutdown { reason, .. } => format!("Shutdown requested: {}", reason),
        }
    }
}

/// Sending half of the control channel.
///
/// Every producer funnels into one receiver owned by the capture loop, so
/// tracking and recording state only ever change on that loop.
#[derive(Debug, Clone)]
pub struct ControlSender {
    sender: mpsc::Sender<ControlEvent>,
}

/// Create a bounded control channel
pub fn control_channel(capacity: usize) -> (ControlSender, mpsc::Receiver<ControlEvent>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (ControlSender { sender }, receiver)
}

impl ControlSender {
    pub async fn send(&self, event: ControlEvent) -> Result<()> {
        debug!("Sending control event: {}", event.description());
        self.sender
            .send(event)
            .await
            .map_err(|_| BodycapError::system("Control channel closed"))
    }

    /// Send from a non-async thread such as the keyboard listener
    pub fn blocking_send(&self, event: ControlEvent) -> Result<()> {
        if let ControlEvent::Shutdown { reason, .. } = &event {
            info!("Shutdown requested: {}", reason);
        }
        self.sender
            .blocking_send(event)
            .map_err(|_| BodycapError::system("Control channel closed"))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
