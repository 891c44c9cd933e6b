use derive_more::Display;

/// The lifecycle state of the receiver player.
///
/// Exactly one state is active at a time, the player starts in [PlayerState::Launching].
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PlayerState {
    /// The receiver has been launched and is waiting for a first load request.
    #[display("launching")]
    Launching,
    /// A media item is being loaded.
    #[display("loading")]
    Loading,
    /// The media item is waiting for more data.
    #[display("buffering")]
    Buffering,
    /// The media item is playing.
    #[display("playing")]
    Playing,
    /// The media item is paused, images are always shown in this state.
    #[display("paused")]
    Paused,
    #[display("stalled")]
    Stalled,
    /// The playback has completed, has been stopped or has failed.
    #[display("done")]
    Done,
    /// The receiver is about to close the session if nothing happens.
    #[display("idle")]
    Idle,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::Launching
    }
}

/// The type of media content which is being displayed by the receiver.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum ContentType {
    #[display("image")]
    Image,
    #[display("video")]
    Video,
}

impl ContentType {
    const IMAGE_PREFIX: &'static str = "image/";
    const VIDEO_PREFIX: &'static str = "video/";

    /// Derive the content type from the given MIME type.
    ///
    /// It returns [None] when the MIME type is not an image or video type.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();

        if mime.starts_with(Self::IMAGE_PREFIX) {
            Some(Self::Image)
        } else if mime.starts_with(Self::VIDEO_PREFIX) {
            Some(Self::Video)
        } else {
            None
        }
    }
}
