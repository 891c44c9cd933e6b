use crate::core::config::{ConfigError, Result};
use crate::core::players::IdleTimeouts;
use crate::core::utils::time::deserialize_millis;

use log::{debug, trace, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use std::{env, fs};

const DEFAULT_CROSSFADE: fn() -> Duration = || Duration::from_millis(750);
const DEFAULT_PLAYING_DELAY: fn() -> Duration = || Duration::from_millis(3000);
const DEFAULT_SEEKING_INDICATOR: fn() -> Duration = || Duration::from_millis(3000);
const DEFAULT_PROGRESS_INDICATOR: fn() -> Duration = || Duration::from_millis(3000);

const DEFAULT_CONFIG_FILENAME: &str = "application";
const CONFIG_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

#[derive(Debug, Default, Deserialize)]
struct PropertiesWrapper {
    #[serde(default)]
    receiver: ReceiverProperties,
}

/// The static properties of the receiver player.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReceiverProperties {
    /// The idle timeouts of each player state.
    #[serde(default)]
    pub idle_timeouts: IdleTimeouts,
    /// The duration of a single fade of a crossfade transition.
    #[serde(default = "DEFAULT_CROSSFADE", deserialize_with = "deserialize_millis")]
    pub crossfade: Duration,
    /// The delay before the player transitions from loading to playing.
    #[serde(default = "DEFAULT_PLAYING_DELAY", deserialize_with = "deserialize_millis")]
    pub playing_delay: Duration,
    /// The time the seeking indicator remains visible after a seek completed.
    #[serde(
        default = "DEFAULT_SEEKING_INDICATOR",
        deserialize_with = "deserialize_millis"
    )]
    pub seeking_indicator: Duration,
    /// The time the progress bar remains visible when it's shown briefly.
    #[serde(
        default = "DEFAULT_PROGRESS_INDICATOR",
        deserialize_with = "deserialize_millis"
    )]
    pub progress_indicator: Duration,
}

impl ReceiverProperties {
    /// Create new receiver properties by searching the working directory for an `application.yml`
    /// or `application.yaml` config file.
    /// It falls back to the default properties when no valid config file could be found.
    pub fn new_auto() -> Self {
        match Self::find_existing_file(DEFAULT_CONFIG_FILENAME) {
            Some(path) => Self::from_path(&path).unwrap_or_else(|e| {
                warn!("Failed to load {:?}, using defaults instead, {}", path, e);
                Self::default()
            }),
            None => {
                debug!("No config file found, using default receiver properties");
                Self::default()
            }
        }
    }

    /// Load the receiver properties from the given config file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading receiver properties from {:?}", path);
        let data = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_string_lossy().to_string(), e))?;

        Self::from_str(data.as_str())
    }

    fn find_existing_file(filename: &str) -> Option<PathBuf> {
        let directory = env::current_dir().ok()?;

        CONFIG_EXTENSIONS
            .iter()
            .map(|extension| directory.join(format!("{}.{}", filename, extension)))
            .find(|path| {
                let exists = path.is_file();
                if !exists {
                    trace!("Config file location {:?} doesn't exist", path);
                }
                exists
            })
    }
}

impl FromStr for ReceiverProperties {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self> {
        trace!("Parsing config data {}", value);
        if value.trim().is_empty() {
            return Ok(Self::default());
        }

        let wrapper: PropertiesWrapper =
            serde_yaml::from_str(value).map_err(|e| ConfigError::Parse(e.to_string()))?;
        debug!("Parsed receiver properties {:?}", wrapper.receiver);
        Ok(wrapper.receiver)
    }
}

impl Default for ReceiverProperties {
    fn default() -> Self {
        Self {
            idle_timeouts: IdleTimeouts::default(),
            crossfade: DEFAULT_CROSSFADE(),
            playing_delay: DEFAULT_PLAYING_DELAY(),
            seeking_indicator: DEFAULT_SEEKING_INDICATOR(),
            progress_indicator: DEFAULT_PROGRESS_INDICATOR(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::init_logger;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_str() {
        init_logger!();
        let data = r#"
receiver:
  crossfade: 500
  playing-delay: 1000
  idle-timeouts:
    paused: 60000
    idle: null
"#;

        let result = ReceiverProperties::from_str(data).unwrap();

        assert_eq!(Duration::from_millis(500), result.crossfade);
        assert_eq!(Duration::from_secs(1), result.playing_delay);
        assert_eq!(Duration::from_secs(3), result.seeking_indicator);
        assert_eq!(Some(Duration::from_secs(60)), result.idle_timeouts.paused);
        assert_eq!(None, result.idle_timeouts.idle);
        assert_eq!(
            Some(Duration::from_secs(30)),
            result.idle_timeouts.launching
        );
    }

    #[test]
    fn test_from_str_empty() {
        init_logger!();

        let result = ReceiverProperties::from_str("").unwrap();

        assert_eq!(ReceiverProperties::default(), result);
    }

    #[test]
    fn test_from_str_invalid() {
        init_logger!();

        let result = ReceiverProperties::from_str("receiver: [lorem");

        assert_eq!(Err(ConfigError::Parse(String::new())), result);
    }

    #[test]
    fn test_from_path() {
        init_logger!();
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "receiver:\n  progress-indicator: 1500\n").unwrap();

        let result = ReceiverProperties::from_path(file.path()).unwrap();

        assert_eq!(Duration::from_millis(1500), result.progress_indicator);
        assert_eq!(Duration::from_millis(750), result.crossfade);
    }

    #[test]
    fn test_from_path_not_found() {
        init_logger!();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.yml");

        let result = ReceiverProperties::from_path(&path);

        assert_eq!(
            Err(ConfigError::Io(
                path.to_string_lossy().to_string(),
                std::io::Error::from(std::io::ErrorKind::NotFound)
            )),
            result
        );
    }

    #[test]
    fn test_new_auto_without_config_file() {
        init_logger!();

        let result = ReceiverProperties::new_auto();

        assert_eq!(ReceiverProperties::default(), result);
    }
}
