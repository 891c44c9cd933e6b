use std::io;
use thiserror::Error;

/// The result type of message bus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The message bus related errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("message namespace cannot be empty")]
    MissingNamespace,
    #[error("message namespace \"{0}\" is not supported")]
    UnsupportedNamespace(String),
    #[error("failed to parse message, {0}")]
    Parse(serde_json::Error),
    #[error("an io error occurred, {0}")]
    Io(io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Parse(error)
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::MissingNamespace, Error::MissingNamespace) => true,
            (Error::UnsupportedNamespace(a), Error::UnsupportedNamespace(b)) => a == b,
            (Error::Parse(_), Error::Parse(_)) => true,
            (Error::Io(_), Error::Io(_)) => true,
            _ => false,
        }
    }
}
