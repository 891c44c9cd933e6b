use crate::core::players::{ContentType, PlayerState};

use async_trait::async_trait;
use derive_more::Display;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// The player marker which is exposed to the visual shell for styling purposes.
///
/// The marker is rendered as `player <content type> <state>`, e.g. `player video playing`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMarker {
    pub content_type: Option<ContentType>,
    pub state: PlayerState,
}

impl std::fmt::Display for PlayerMarker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.content_type {
            Some(content_type) => write!(f, "player {} {}", content_type, self.state),
            None => write!(f, "player {}", self.state),
        }
    }
}

/// The metadata of the loaded media item which is shown by the visual shell.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    /// The url of the artwork image.
    pub artwork: Option<String>,
}

/// The formatted playback progress of the loaded media.
#[derive(Debug, Display, Clone, PartialEq)]
#[display("{}/{} ({:.1}%)", current_time, total_time, percentage)]
pub struct Progress {
    pub current_time: String,
    pub total_time: String,
    pub percentage: f64,
}

/// The playback indicator which is shown next to the progress bar.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackIndicator {
    #[display("play")]
    Play,
    #[display("pause")]
    Pause,
}

/// The visual shell around the media surface.
/// It renders the player marker, metadata, progress bar and fades the complete player.
#[async_trait]
pub trait VisualShell: Debug + Send + Sync {
    /// Update the player marker of the shell.
    fn update_marker(&self, marker: &PlayerMarker);

    /// Update the media metadata that is shown by the shell.
    fn update_metadata(&self, metadata: &MediaMetadata);

    /// Update the progress bar of the shell.
    fn update_progress(&self, progress: &Progress);

    /// Show or hide the seeking indicator.
    fn set_seeking(&self, seeking: bool);

    fn set_progress_visible(&self, visible: bool);

    fn show_indicator(&self, indicator: PlaybackIndicator);

    /// Show the volume level, between `0` and `100`, to the user.
    fn show_volume(&self, level: u32);

    /// Fade the shell out over the given duration.
    /// The future completes once the shell has been faded out completely.
    async fn fade_out(&self, duration: Duration);

    /// Fade the shell in over the given duration.
    async fn fade_in(&self, duration: Duration);

    /// Close the receiver session.
    fn close(&self);
}
