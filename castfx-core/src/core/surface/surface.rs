use derive_more::Display;
use fx_callback::Callback;
use std::fmt::Debug;

/// The events emitted by a [MediaSurface] during playback.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The surface is trying to fetch media data, but the data is unexpectedly not forthcoming.
    #[display("stalled")]
    Stalled,
    /// The playback has stopped because of a temporary lack of data.
    #[display("waiting")]
    Waiting,
    /// The playback is ready to start after having been paused or delayed.
    #[display("playing")]
    Playing,
    #[display("pause")]
    Pause,
    /// The end of the media has been reached.
    #[display("ended")]
    Ended,
    /// The current playback position of the media has changed.
    #[display("time update {}/{}", current_time, duration)]
    TimeUpdate { current_time: f64, duration: f64 },
    #[display("seeking")]
    Seeking,
    #[display("seeked")]
    Seeked,
    /// The media could not be loaded or played.
    #[display("error")]
    Error,
    /// The image source has been loaded.
    #[display("image loaded")]
    ImageLoaded,
    /// The visibility of the hosting document has changed.
    #[display("visibility changed, hidden {}", hidden)]
    VisibilityChanged { hidden: bool },
}

/// The display mode of a subtitle track.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum TextTrackMode {
    #[display("showing")]
    Showing,
    #[display("hidden")]
    Hidden,
}

impl TextTrackMode {
    /// Get the opposite mode of this mode.
    pub fn toggle(&self) -> Self {
        match self {
            Self::Showing => Self::Hidden,
            Self::Hidden => Self::Showing,
        }
    }
}

/// The playback surface of the receiver which renders the video and image elements.
///
/// The surface reports its playback through [SurfaceEvent] events.
pub trait MediaSurface: Callback<SurfaceEvent> + Debug + Send + Sync {
    /// Start or resume the playback of the video element.
    fn play(&self);

    /// Pause the playback of the video element.
    fn pause(&self);

    /// Reload the current video source.
    fn load(&self);

    /// Get the current playback position of the video element in seconds.
    fn current_time(&self) -> f64;

    /// Set the playback position of the video element in seconds.
    fn set_current_time(&self, time: f64);

    fn set_autoplay(&self, autoplay: bool);

    /// Set the source of the video element, [None] blanks the element.
    fn set_video_source(&self, source: Option<String>);

    /// Set the source of the image element, [None] blanks the element.
    fn set_image_source(&self, source: Option<String>);

    /// Replace the subtitle track of the video element.
    /// A [None] source removes the current subtitle track.
    fn set_text_track(&self, source: Option<String>, mode: TextTrackMode);

    /// Get the display mode of the current subtitle track, if one is attached.
    fn text_track_mode(&self) -> Option<TextTrackMode>;

    /// Update the display mode of the current subtitle track.
    fn set_text_track_mode(&self, mode: TextTrackMode);
}
