use crate::core::players::{ContentType, PlayerState};
use crate::core::surface::Progress;

use derive_more::Display;

/// The events published by the [crate::core::players::CastPlayer].
#[derive(Debug, Display, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Invoked when the state of the player has changed.
    #[display("player state changed to {}", _0)]
    StateChanged(PlayerState),
    /// Invoked when a load request changed the content type of the player.
    #[display("player content type changed to {}", _0)]
    ContentTypeChanged(ContentType),
    /// Invoked when the playback progress has been updated.
    #[display("player progress changed to {}", _0)]
    ProgressChanged(Progress),
    /// Invoked when the receiver session has been terminated after idling.
    #[display("player session has been closed")]
    SessionClosed,
}
