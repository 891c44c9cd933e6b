use thiserror::Error;

/// The result type of player operations.
pub type Result<T> = std::result::Result<T, PlayerError>;

/// The errors which can occur while building a player.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlayerError {
    #[error("the player {0} is missing")]
    MissingDependency(&'static str),
}
