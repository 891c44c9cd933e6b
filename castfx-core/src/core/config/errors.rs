use thiserror::Error;

/// The result type of configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}, {1}")]
    Io(String, std::io::Error),
    #[error("failed to parse config, {0}")]
    Parse(String),
}

impl PartialEq for ConfigError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConfigError::Io(path, _), ConfigError::Io(other_path, _)) => path == other_path,
            (ConfigError::Parse(_), ConfigError::Parse(_)) => true,
            _ => false,
        }
    }
}
