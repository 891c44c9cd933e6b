use crate::{Error, Result};
use log::{info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const LOG_FORMAT_CONSOLE: &str = "\x1B[37m{d(%Y-%m-%d %H:%M:%S%.3f)}\x1B[0m {h({l:>5.5})} \x1B[37m---\x1B[0m \x1B[37m[{T:>15.15}]\x1B[0m \x1B[36m{t:<40.40}\x1B[0m \x1B[37m:\x1B[0m {m}{n}";
const LOG_FORMAT_FILE: &str =
    "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:>5.5} --- [{T:>15.15}] {t:<40.40} : {m}{n}";
const CONSOLE_APPENDER: &str = "stderr";
const FILE_APPENDER: &str = "file";
const LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILE_WINDOW: u32 = 3;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// The log4rs backed logger of the receiver.
///
/// Only one instance can exist per process, as the [log] facade can only be bound once.
#[derive(Debug)]
pub struct ReceiverLogger {
    root_level: LevelFilter,
}

impl ReceiverLogger {
    /// Returns a builder instance for the logger.
    pub fn builder() -> ReceiverLoggerBuilder {
        ReceiverLoggerBuilder::default()
    }

    /// The most verbose level which is logged by the receiver.
    pub fn root_level(&self) -> LevelFilter {
        self.root_level
    }

    fn init(config: Config) -> Result<Self> {
        if INITIALIZED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyInitialized);
        }

        let handle =
            log4rs::init_config(config).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        info!("Receiver logger has been initialized");
        Ok(Self {
            root_level: handle.max_log_level(),
        })
    }

    fn load_from_config(path: impl AsRef<Path>) -> Result<Config> {
        log4rs::config::load_config_file(path, Default::default())
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn create_config(
        root_level: LevelFilter,
        log_path: Option<impl AsRef<Path>>,
        loggers: Vec<(String, LevelFilter)>,
    ) -> Result<Config> {
        let mut root = Root::builder().appender(CONSOLE_APPENDER);
        // stdout is reserved for the receiver host
        let mut config_builder = Config::builder().appender(
            Appender::builder().build(
                CONSOLE_APPENDER,
                Box::new(
                    ConsoleAppender::builder()
                        .target(log4rs::append::console::Target::Stderr)
                        .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_CONSOLE)))
                        .build(),
                ),
            ),
        );

        if let Some(path) = log_path {
            config_builder = config_builder.appender(Self::create_file_appender(path)?);
            root = root.appender(FILE_APPENDER);
        }

        for (logger, level) in loggers.into_iter() {
            config_builder = config_builder.logger(Logger::builder().build(logger, level));
        }

        config_builder
            .build(root.build(root_level))
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn create_file_appender(path: impl AsRef<Path>) -> Result<Appender> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let pattern = Self::roller_pattern(path.as_ref());
        let roller = FixedWindowRoller::builder()
            .base(1)
            .build(pattern.as_str(), LOG_FILE_WINDOW)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(LOG_FILE_SIZE)),
            Box::new(roller),
        );

        Ok(Appender::builder().build(
            FILE_APPENDER,
            Box::new(
                RollingFileAppender::builder()
                    .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_FILE)))
                    .append(false)
                    .build(path, Box::new(policy))
                    .map_err(|e| Error::InvalidConfig(e.to_string()))?,
            ),
        ))
    }

    /// Returns the archive pattern for the given log file, e.g. `castfx.log` becomes `castfx.{}.log`.
    fn roller_pattern(path: &Path) -> String {
        let stem = path
            .file_stem()
            .and_then(|e| e.to_str())
            .unwrap_or("castfx");
        let archive = match path.extension().and_then(|e| e.to_str()) {
            Some(extension) => format!("{}.{{}}.{}", stem, extension),
            None => format!("{}.{{}}", stem),
        };

        path.with_file_name(archive).to_string_lossy().to_string()
    }
}

#[derive(Debug, Default)]
pub struct ReceiverLoggerBuilder {
    root_level: Option<LevelFilter>,
    config_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    loggers: HashMap<String, LevelFilter>,
}

impl ReceiverLoggerBuilder {
    /// Set the root level of the logger.
    pub fn root_level(&mut self, level: LevelFilter) -> &mut Self {
        self.root_level = Some(level);
        self
    }

    /// Set the path of the `log4.yml` config to load.
    pub fn config_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the log file path of the logger.
    pub fn log_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.log_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add a log level filter for the given package.
    pub fn logger<S: AsRef<str>>(&mut self, package: S, level: LevelFilter) -> &mut Self {
        self.loggers.insert(package.as_ref().to_string(), level);
        self
    }

    /// Consumes the builder data and initializes the receiver logger.
    ///
    /// When a config path is set, the `log4.yml` file is loaded and all other options are ignored.
    pub fn build(&mut self) -> Result<ReceiverLogger> {
        let config = match self.config_path.take() {
            Some(path) => ReceiverLogger::load_from_config(path)?,
            None => ReceiverLogger::create_config(
                self.root_level.take().unwrap_or(LevelFilter::Info),
                self.log_path.take(),
                self.loggers.drain().collect(),
            )?,
        };

        ReceiverLogger::init(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new() {
        let temp_dir = tempdir().unwrap();
        let logger = ReceiverLogger::builder()
            .root_level(LevelFilter::Trace)
            .log_path(temp_dir.path().join("logs").join("castfx.log"))
            .logger("castfx_core::core::scheduler", LevelFilter::Debug)
            .build()
            .expect("expected a logger");

        let result = logger.root_level();
        assert_eq!(LevelFilter::Trace, result);
        assert!(
            temp_dir.path().join("logs").exists(),
            "expected the log directory to have been created"
        );

        // try to create a second instance
        let result = ReceiverLogger::builder()
            .build()
            .err()
            .expect("expected an error to have been returned");
        assert_eq!(Error::AlreadyInitialized, result);
    }

    #[test]
    fn test_create_config() {
        let loggers = vec![("fx_callback".to_string(), LevelFilter::Info)];

        let result = ReceiverLogger::create_config(LevelFilter::Debug, None::<PathBuf>, loggers);

        assert!(
            result.is_ok(),
            "expected the config to be valid, got {:?} instead",
            result.err()
        );
    }

    #[test]
    fn test_load_from_config_invalid_path() {
        let temp_dir = tempdir().unwrap();

        let result = ReceiverLogger::load_from_config(temp_dir.path().join("log4.yml"));

        assert_eq!(
            Err(Error::InvalidConfig(String::new())),
            result.map(|_| ())
        );
    }

    #[test]
    fn test_roller_pattern() {
        let result = ReceiverLogger::roller_pattern(Path::new("/var/log/castfx.log"));
        assert_eq!("/var/log/castfx.{}.log", result);

        let result = ReceiverLogger::roller_pattern(Path::new("/var/log/castfx"));
        assert_eq!("/var/log/castfx.{}", result);
    }
}
