use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BodycapConfig {
    pub sensor: SensorConfig,
    pub tracking: TrackingConfig,
    pub recording: RecordingConfig,
    pub system: SystemConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SensorConfig {
    /// Capture loop tick rate
    #[serde(default = "default_sensor_fps")]
    pub fps: u32,

    /// JSON-lines body recording to play back instead of a live sensor
    #[serde(default)]
    pub replay_path: Option<String>,

    /// Restart the replay when it runs out
    #[serde(default)]
    pub loop_replay: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrackingConfig {
    /// How long the last skeleton stays on screen after tracking is lost
    #[serde(default = "default_visibility_grace_ms")]
    pub visibility_grace_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RecordingConfig {
    /// Rate written to the TRC header; row times derive from it
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: u32,

    /// Directory receiving exported .trc files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Prefix of generated file names
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SystemConfig {
    /// Capacity of the keyboard/control channel
    #[serde(default = "default_control_channel_capacity")]
    pub control_channel_capacity: usize,
}

impl BodycapConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("sensor.fps", default_sensor_fps())?
            .set_default("sensor.loop_replay", false)?
            .set_default(
                "tracking.visibility_grace_ms",
                default_visibility_grace_ms() as i64,
            )?
            .set_default("recording.sample_rate_hz", default_sample_rate_hz())?
            .set_default("recording.output_dir", default_output_dir())?
            .set_default("recording.file_prefix", default_file_prefix())?
            .set_default(
                "system.control_channel_capacity",
                default_control_channel_capacity() as i64,
            )?
            .add_source(File::with_name(&path_str).required(false))
            .add_source(Environment::with_prefix("BODYCAP").separator("__"))
            .build()?;

        let config: BodycapConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor.fps == 0 {
            return Err(ConfigError::Message(
                "Sensor fps must be greater than 0".to_string(),
            ));
        }

        if self.recording.sample_rate_hz == 0 {
            return Err(ConfigError::Message(
                "Recording sample_rate_hz must be greater than 0".to_string(),
            ));
        }

        if self.recording.file_prefix.trim().is_empty() {
            return Err(ConfigError::Message(
                "Recording file_prefix must not be empty".to_string(),
            ));
        }

        if self.system.control_channel_capacity == 0 {
            return Err(ConfigError::Message(
                "Control channel capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.sensor.fps.max(1) as f64)
    }

    pub fn visibility_grace(&self) -> Duration {
        Duration::from_millis(self.tracking.visibility_grace_ms)
    }
}

impl Default for BodycapConfig {
    fn default() -> Self {
        Self {
            sensor: SensorConfig {
                fps: default_sensor_fps(),
                replay_path: None,
                loop_replay: false,
            },
            tracking: TrackingConfig {
                visibility_grace_ms: default_visibility_grace_ms(),
            },
            recording: RecordingConfig {
                sample_rate_hz: default_sample_rate_hz(),
                output_dir: default_output_dir(),
                file_prefix: default_file_prefix(),
            },
            system: SystemConfig {
                control_channel_capacity: default_control_channel_capacity(),
            },
        }
    }
}

// Default value functions
fn default_sensor_fps() -> u32 {
    30
}

fn default_visibility_grace_ms() -> u64 {
    500
}

fn default_sample_rate_hz() -> u32 {
    30
}
fn default_output_dir() -> String {
    "./recordings".to_string()
}
fn default_file_prefix() -> String {
    "mocap".to_string()
}

fn default_control_channel_capacity() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = BodycapConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.recording.sample_rate_hz, 30);
        assert_eq!(config.visibility_grace(), Duration::from_millis(500));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = BodycapConfig::load_from_file("/nonexistent/bodycap.toml").unwrap();
        assert_eq!(config, BodycapConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[sensor]\nfps = 15\nreplay_path = \"take.jsonl\"\n\n[recording]\nsample_rate_hz = 60\n"
        )
        .unwrap();

        let config = BodycapConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.sensor.fps, 15);
        assert_eq!(config.sensor.replay_path.as_deref(), Some("take.jsonl"));
        assert_eq!(config.recording.sample_rate_hz, 60);
        assert_eq!(config.recording.output_dir, "./recordings");
    }

    #[test]
    fn test_config_validation() {
        let mut config = BodycapConfig::default();
        config.recording.sample_rate_hz = 0;
        assert!(config.validate().is_err());

        config.recording.sample_rate_hz = 30;
        config.recording.file_prefix = "  ".to_string();
        assert!(config.validate().is_err());

        config.recording.file_prefix = "take".to_string();
        config.sensor.fps = 0;
        assert!(config.validate().is_err());

        config.sensor.fps = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_serializes_to_toml() {
        let rendered = toml::to_string_pretty(&BodycapConfig::default()).unwrap();
        assert!(rendered.contains("[recording]"));
        assert!(rendered.contains("sample_rate_hz = 30"));
    }
}
