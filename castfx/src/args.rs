use castfx_core::core::config::ReceiverProperties;
use clap::Parser;
use derive_more::Display;
use log::{warn, LevelFilter};
use std::path::PathBuf;
use std::str::FromStr;

/// The options of the castfx receiver host.
#[derive(Debug, Clone, Display, Parser)]
#[command(name = "castfx", version, about)]
#[display("config: {:?}, log_level: {}", config, log_level)]
pub struct ReceiverArgs {
    /// The `application.yml` config file of the receiver.
    /// The working directory is searched for the config file when not set.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// The root log level of the receiver.
    #[arg(long, default_value_t = LevelFilter::Info, value_parser = parse_level)]
    pub log_level: LevelFilter,
    /// Write the log output to the given rolling log file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Load the logger configuration from the given `log4.yml` file.
    #[arg(long)]
    pub log_config: Option<PathBuf>,
    /// Disable the default `log4rs` logger of the receiver.
    #[arg(long, default_value_t = false)]
    pub disable_logger: bool,
}

impl ReceiverArgs {
    /// Load the receiver properties of the arguments.
    /// It falls back to the default properties when the config file couldn't be loaded.
    pub fn properties(&self) -> ReceiverProperties {
        match self.config.as_ref() {
            Some(path) => ReceiverProperties::from_path(path).unwrap_or_else(|e| {
                warn!("Failed to load config {:?}, using defaults instead, {}", path, e);
                ReceiverProperties::default()
            }),
            None => ReceiverProperties::new_auto(),
        }
    }
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    LevelFilter::from_str(value).map_err(|_| format!("invalid log level \"{}\"", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_defaults() {
        let result = ReceiverArgs::try_parse_from(["castfx"]).unwrap();

        assert_eq!(None, result.config);
        assert_eq!(LevelFilter::Info, result.log_level);
        assert_eq!(false, result.disable_logger);
    }

    #[test]
    fn test_parse() {
        let result = ReceiverArgs::try_parse_from([
            "castfx",
            "--log-level",
            "debug",
            "--log-file",
            "/tmp/castfx.log",
            "--disable-logger",
        ])
        .unwrap();

        assert_eq!(LevelFilter::Debug, result.log_level);
        assert_eq!(Some(PathBuf::from("/tmp/castfx.log")), result.log_file);
        assert_eq!(true, result.disable_logger);
    }

    #[test]
    fn test_parse_invalid_log_level() {
        let result = ReceiverArgs::try_parse_from(["castfx", "--log-level", "lorem"]);

        assert!(result.is_err(), "expected the log level to be rejected");
    }

    #[test]
    fn test_properties() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "receiver:\n  crossfade: 250\n").unwrap();
        let args = ReceiverArgs::try_parse_from([
            "castfx",
            "--config",
            file.path().to_str().unwrap(),
        ])
        .unwrap();

        let result = args.properties();

        assert_eq!(Duration::from_millis(250), result.crossfade);
    }

    #[test]
    fn test_properties_missing_config() {
        let args =
            ReceiverArgs::try_parse_from(["castfx", "--config", "/lorem/ipsum/application.yml"])
                .unwrap();

        let result = args.properties();

        assert_eq!(ReceiverProperties::default(), result);
    }
}
