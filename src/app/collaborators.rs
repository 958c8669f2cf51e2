use super::types::{Notice, RenderStatus};
use tracing::{debug, error, info, warn};

/// Draws the colour feed with the skeleton overlay
pub trait Renderer: Send {
    fn render(&mut self, status: &RenderStatus<'_>);
}

/// Tells the user about recording and export results
pub trait Notifier: Send {
    fn notify(&mut self, notice: Notice);
}

/// Renderer that reports overlay state through tracing
#[derive(Debug, Default)]
pub struct LogRenderer {
    last_status: Option<&'static str>,
    last_visible: bool,
}

impl Renderer for LogRenderer {
    fn render(&mut self, status: &RenderStatus<'_>) {
        let visible = status.skeleton.is_some();
        if visible != self.last_visible {
            info!(
                "Skeleton {} at frame {}",
                if visible { "visible" } else { "lost" },
                status.frame_counter
            );
            self.last_visible = visible;
        }

        let line = status.status_line();
        if line != self.last_status {
            if let Some(text) = line {
                info!("{}", text);
            }
            self.last_status = line;
        }

        if let Some(skeleton) = status.skeleton {
            debug!(
                frame = status.frame_counter,
                limbs = skeleton.limbs().len(),
                recorded = status.recorded_frames,
                "Overlay drawn"
            );
        }
    }
}

/// Notifier that reports through tracing
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice {
            Notice::RecordingStarted => info!("Recording started"),
            Notice::NothingRecorded => info!("Recording stopped, no skeleton frames captured"),
            Notice::Exported { path, frames } => {
                info!("Saved {} frames to {}", frames, path.display())
            }
            Notice::ExportCancelled => warn!("Export cancelled, recording discarded"),
            Notice::EncodingFailed { details } => {
                error!("Recording could not be encoded and was discarded: {}", details)
            }
            Notice::WriteFailed { details } => {
                error!("Recording could not be saved and was discarded: {}", details)
            }
        }
    }
}
