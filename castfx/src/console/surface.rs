use castfx_core::core::surface::{MediaSurface, SurfaceEvent, TextTrackMode};
use fx_callback::{Callback, MultiThreadedCallback, Subscriber, Subscription};
use log::{debug, info, trace};
use std::sync::{Mutex, MutexGuard};

/// A headless media surface which logs every side effect and simulates the events of a video element.
#[derive(Debug)]
pub struct ConsoleSurface {
    state: Mutex<SurfaceState>,
    callbacks: MultiThreadedCallback<SurfaceEvent>,
}

#[derive(Debug)]
struct SurfaceState {
    video_source: Option<String>,
    image_source: Option<String>,
    autoplay: bool,
    paused: bool,
    current_time: f64,
    text_track: Option<TextTrack>,
}

#[derive(Debug)]
struct TextTrack {
    source: String,
    mode: TextTrackMode,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            video_source: None,
            image_source: None,
            autoplay: false,
            paused: true,
            current_time: 0.0,
            text_track: None,
        }
    }
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SurfaceState::default()),
            callbacks: MultiThreadedCallback::new(),
        }
    }

    /// Simulate the given event as if it was emitted by the video or image element.
    pub fn simulate(&self, event: SurfaceEvent) {
        {
            let mut state = self.state();
            match &event {
                SurfaceEvent::Playing => state.paused = false,
                SurfaceEvent::Pause | SurfaceEvent::Ended => state.paused = true,
                SurfaceEvent::TimeUpdate { current_time, .. } => {
                    state.current_time = *current_time
                }
                _ => {}
            }
        }

        self.emit(event);
    }

    /// Get the current video source of the surface.
    pub fn video_source(&self) -> Option<String> {
        self.state().video_source.clone()
    }

    #[cfg(test)]
    pub fn image_source(&self) -> Option<String> {
        self.state().image_source.clone()
    }

    #[cfg(test)]
    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn emit(&self, event: SurfaceEvent) {
        trace!("Console surface is emitting {}", event);
        self.callbacks.invoke(event);
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSurface for ConsoleSurface {
    fn play(&self) {
        let resumed = {
            let mut state = self.state();
            let resumed = state.video_source.is_some() && state.paused;
            if resumed {
                state.paused = false;
            }
            resumed
        };

        if resumed {
            info!("Console surface started playback");
            self.emit(SurfaceEvent::Playing);
        }
    }

    fn pause(&self) {
        let paused = {
            let mut state = self.state();
            let paused = state.video_source.is_some() && !state.paused;
            if paused {
                state.paused = true;
            }
            paused
        };

        if paused {
            info!("Console surface paused playback");
            self.emit(SurfaceEvent::Pause);
        }
    }

    fn load(&self) {
        info!(
            "Console surface is reloading {:?}",
            self.state().video_source
        );
    }

    fn current_time(&self) -> f64 {
        self.state().current_time
    }

    fn set_current_time(&self, time: f64) {
        let has_source = {
            let mut state = self.state();
            state.current_time = time;
            state.video_source.is_some()
        };

        debug!("Console surface is seeking to {}s", time);
        if has_source {
            self.emit(SurfaceEvent::Seeking);
            self.emit(SurfaceEvent::Seeked);
        }
    }

    fn set_autoplay(&self, autoplay: bool) {
        self.state().autoplay = autoplay;
    }

    fn set_video_source(&self, source: Option<String>) {
        let autoplay = {
            let mut state = self.state();
            state.video_source = source.clone();
            state.paused = true;
            state.current_time = 0.0;
            source.is_some() && state.autoplay
        };

        info!("Console surface video source {:?}", source);
        if autoplay {
            self.play();
        }
    }

    fn set_image_source(&self, source: Option<String>) {
        self.state().image_source = source.clone();

        info!("Console surface image source {:?}", source);
        if source.is_some() {
            self.emit(SurfaceEvent::ImageLoaded);
        }
    }

    fn set_text_track(&self, source: Option<String>, mode: TextTrackMode) {
        debug!("Console surface text track {:?} ({})", source, mode);
        self.state().text_track = source.map(|source| TextTrack { source, mode });
    }

    fn text_track_mode(&self) -> Option<TextTrackMode> {
        self.state().text_track.as_ref().map(|e| e.mode)
    }

    fn set_text_track_mode(&self, mode: TextTrackMode) {
        if let Some(track) = self.state().text_track.as_mut() {
            info!("Console surface text track {} is {}", track.source, mode);
            track.mode = mode;
        }
    }
}

impl Callback<SurfaceEvent> for ConsoleSurface {
    fn subscribe(&self) -> Subscription<SurfaceEvent> {
        self.callbacks.subscribe()
    }

    fn subscribe_with(&self, subscriber: Subscriber<SurfaceEvent>) {
        self.callbacks.subscribe_with(subscriber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use castfx_core::{init_logger, recv_timeout};
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn test_set_video_source_with_autoplay() {
        init_logger!();
        let surface = ConsoleSurface::new();
        let mut events = surface.subscribe();

        surface.set_autoplay(true);
        surface.set_video_source(Some("http://localhost/movie.mp4".to_string()));

        let event = recv_timeout!(&mut events, TIMEOUT);
        assert_eq!(SurfaceEvent::Playing, *event);
        assert_eq!(false, surface.is_paused());
    }

    #[tokio::test]
    async fn test_pause_without_source() {
        init_logger!();
        let surface = ConsoleSurface::new();
        let mut events = surface.subscribe();

        surface.pause();
        surface.play();

        assert_eq!(true, events.try_recv().is_err());
        assert_eq!(true, surface.is_paused());
    }

    #[tokio::test]
    async fn test_pause_and_play() {
        init_logger!();
        let surface = ConsoleSurface::new();
        let mut events = surface.subscribe();
        surface.set_video_source(Some("http://localhost/movie.mp4".to_string()));

        surface.play();
        assert_eq!(SurfaceEvent::Playing, *recv_timeout!(&mut events, TIMEOUT));

        surface.pause();
        assert_eq!(SurfaceEvent::Pause, *recv_timeout!(&mut events, TIMEOUT));
    }

    #[tokio::test]
    async fn test_set_image_source() {
        init_logger!();
        let surface = ConsoleSurface::new();
        let mut events = surface.subscribe();

        surface.set_image_source(Some("http://localhost/image.png".to_string()));

        assert_eq!(SurfaceEvent::ImageLoaded, *recv_timeout!(&mut events, TIMEOUT));
        assert_eq!(
            Some("http://localhost/image.png".to_string()),
            surface.image_source()
        );
    }

    #[tokio::test]
    async fn test_text_track() {
        init_logger!();
        let surface = ConsoleSurface::new();
        assert_eq!(None, surface.text_track_mode());

        surface.set_text_track_mode(TextTrackMode::Showing);
        assert_eq!(None, surface.text_track_mode());

        surface.set_text_track(Some("http://localhost/en.vtt".to_string()), TextTrackMode::Hidden);
        surface.set_text_track_mode(TextTrackMode::Showing);
        assert_eq!(Some(TextTrackMode::Showing), surface.text_track_mode());

        surface.set_text_track(None, TextTrackMode::Hidden);
        assert_eq!(None, surface.text_track_mode());
    }
}
