use std::{io, result};
use thiserror::Error;

/// The result type of logging operations.
pub type Result<T> = result::Result<T, Error>;

/// The errors of the logging crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("a receiver logger has already been initialized")]
    AlreadyInitialized,
    #[error("logger configuration is invalid, {0}")]
    InvalidConfig(String),
    #[error("an io error occurred, {0}")]
    Io(#[from] io::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        matches!(
            (self, other),
            (Error::AlreadyInitialized, Error::AlreadyInitialized)
                | (Error::InvalidConfig(_), Error::InvalidConfig(_))
                | (Error::Io(_), Error::Io(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_eq() {
        assert_eq!(Error::AlreadyInitialized, Error::AlreadyInitialized);
        assert_eq!(
            Error::InvalidConfig("appender".to_string()),
            Error::InvalidConfig("root".to_string())
        );
        assert_ne!(
            Error::AlreadyInitialized,
            Error::InvalidConfig("root".to_string())
        );
    }

    #[test]
    fn test_from_io() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);

        let result = Error::from(err);

        assert_eq!(Error::Io(io::Error::from(io::ErrorKind::Other)), result);
    }
}
