use crate::error::ExportError;
use crate::recording::Recording;
use crate::skeleton::MarkerSet;
use crate::trc::TrcEncoder;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Decides where a finished recording is written.
///
/// Returning `None` means the user declined, e.g. a cancelled save dialog.
pub trait ExportTarget: Send {
    fn destination(&mut self, recording: &Recording) -> Option<PathBuf>;
}

/// Writes every recording into one directory under a timestamped name
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    directory: PathBuf,
    prefix: String,
}

impl DirectoryTarget {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(directory: P, prefix: S) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    /// File name pattern: PREFIX_YYYYMMDD_HHMMSS_mmm.trc
    pub fn file_name_for(&self, recording: &Recording) -> String {
        format!(
            "{}_{}.trc",
            self.prefix,
            recording.started_at.format("%Y%m%d_%H%M%S_%3f")
        )
    }
}

impl ExportTarget for DirectoryTarget {
    fn destination(&mut self, recording: &Recording) -> Option<PathBuf> {
        Some(self.directory.join(self.file_name_for(recording)))
    }
}

/// Encodes drained recordings and writes them to their destination
pub struct Exporter {
    target: Box<dyn ExportTarget>,
    markers: MarkerSet,
}

impl Exporter {
    pub fn new(target: Box<dyn ExportTarget>, markers: MarkerSet) -> Self {
        Self { target, markers }
    }

    /// Write one recording as a .trc file and return its path
    pub async fn export(&mut self, recording: &Recording) -> Result<PathBuf, ExportError> {
        let path = self
            .target
            .destination(recording)
            .ok_or(ExportError::Cancelled)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "motion.trc".to_string());

        let bytes = TrcEncoder::new(self.markers.clone(), recording.sample_rate_hz)
            .with_file_name(file_name)
            .encode(&recording.frames)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| ExportError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        debug!("Writing {} bytes to {}", bytes.len(), path.display());
        fs::write(&path, &bytes)
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

        info!(
            "Exported recording {} ({} frames) to {}",
            recording.session_id,
            recording.frames.len(),
            path.display()
        );
        Ok(path)
    }
}
