use crate::core::config::ReceiverProperties;
use crate::core::players::{
    CaptionMessage, ContentType, LoadRequest, PlayerError, PlayerEvent, PlayerState, Result,
};
use crate::core::scheduler::{DelayedTask, TimerHandle};
use crate::core::surface::{
    MediaMetadata, MediaSurface, PlaybackIndicator, PlayerMarker, Progress, SurfaceEvent,
    TextTrackMode, VisualShell,
};
use crate::core::utils::time::{format_duration, progress_percentage};

use fx_callback::{Callback, MultiThreadedCallback, Subscriber, Subscription};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// The receiver player which drives the visual shell and media surface through its lifecycle states.
///
/// The player processes the remote commands, surface events and timer expirations one at a time
/// on its own task. Dropping the player stops the task and cancels all timers.
///
/// # Example
///
/// ```rust,no_run
/// use castfx_core::core::config::ReceiverProperties;
/// use castfx_core::core::players::{CastPlayer, LoadRequest};
/// use castfx_core::core::surface::{MediaSurface, VisualShell};
///
/// fn example<S: MediaSurface + 'static, V: VisualShell + 'static>(surface: S, shell: V) {
///     let player = CastPlayer::builder()
///         .surface(surface)
///         .shell(shell)
///         .properties(ReceiverProperties::default())
///         .build()
///         .unwrap();
///
///     player.load(LoadRequest::builder()
///         .content_id("http://localhost:8080/movie.mp4")
///         .content_type("video/mp4")
///         .build());
/// }
/// ```
#[derive(Debug)]
pub struct CastPlayer {
    inner: Arc<InnerPlayer>,
}

impl CastPlayer {
    /// Create a new builder for the cast player.
    pub fn builder() -> CastPlayerBuilder {
        CastPlayerBuilder::default()
    }

    /// Create a new cast player for the given surface and shell.
    /// The player starts in the [PlayerState::Launching] state.
    pub fn new(
        surface: Arc<dyn MediaSurface>,
        shell: Arc<dyn VisualShell>,
        properties: ReceiverProperties,
    ) -> Self {
        let (command_sender, command_receiver) = unbounded_channel();
        let surface_events = surface.subscribe();
        let inner = Arc::new(InnerPlayer {
            surface,
            shell,
            properties,
            data: Mutex::new(PlayerData::default()),
            command_sender,
            callbacks: MultiThreadedCallback::new(),
            cancellation_token: Default::default(),
        });

        inner.send_command(PlayerCommand::SetState {
            state: PlayerState::Launching,
            crossfade: false,
            delay: None,
        });

        let inner_main = inner.clone();
        tokio::spawn(async move {
            inner_main.start(command_receiver, surface_events).await;
        });

        Self { inner }
    }

    /// Get the current state of the player.
    pub async fn state(&self) -> PlayerState {
        self.inner.data.lock().await.state
    }

    /// Get the content type of the last loaded media, if known.
    pub async fn content_type(&self) -> Option<ContentType> {
        self.inner.data.lock().await.content_type
    }

    /// Load the media of the given request.
    pub fn load(&self, request: LoadRequest) {
        self.inner.send_command(PlayerCommand::Load(request))
    }

    /// Stop the current media playback, the player will transition to [PlayerState::Done].
    pub fn stop(&self) {
        self.inner.send_command(PlayerCommand::Stop)
    }

    pub fn pause(&self) {
        self.inner.send_command(PlayerCommand::Pause)
    }

    pub fn resume(&self) {
        self.inner.send_command(PlayerCommand::Resume)
    }

    /// Seek the media playback to the given position in millis.
    pub fn seek(&self, position: u64) {
        self.inner.send_command(PlayerCommand::Seek(position))
    }

    /// Show the given volume level, between `0.0` and `1.0`, to the user.
    pub fn set_volume(&self, level: f32) {
        self.inner.send_command(PlayerCommand::SetVolume(level))
    }

    /// Replace or toggle the captions of the media playback.
    pub fn toggle_captions(&self, message: CaptionMessage) {
        self.inner
            .send_command(PlayerCommand::ToggleCaptions(message))
    }

    /// Update the state of the player.
    ///
    /// # Arguments
    ///
    /// * `state` - The new state of the player.
    /// * `crossfade` - Fade the shell out before the state is applied and fade it back in afterward.
    /// * `delay` - The optional delay after which the state is applied.
    pub fn set_state(&self, state: PlayerState, crossfade: bool, delay: Option<Duration>) {
        self.inner.send_command(PlayerCommand::SetState {
            state,
            crossfade,
            delay,
        })
    }
}

impl Callback<PlayerEvent> for CastPlayer {
    fn subscribe(&self) -> Subscription<PlayerEvent> {
        self.inner.callbacks.subscribe()
    }

    fn subscribe_with(&self, subscriber: Subscriber<PlayerEvent>) {
        self.inner.callbacks.subscribe_with(subscriber)
    }
}

impl Drop for CastPlayer {
    fn drop(&mut self) {
        self.inner.cancellation_token.cancel();
    }
}

#[derive(Debug, Default)]
pub struct CastPlayerBuilder {
    surface: Option<Arc<dyn MediaSurface>>,
    shell: Option<Arc<dyn VisualShell>>,
    properties: Option<ReceiverProperties>,
}

impl CastPlayerBuilder {
    pub fn surface<S: MediaSurface + 'static>(mut self, surface: S) -> Self {
        self.surface = Some(Arc::new(surface));
        self
    }

    pub fn shell<S: VisualShell + 'static>(mut self, shell: S) -> Self {
        self.shell = Some(Arc::new(shell));
        self
    }

    /// Set the properties of the player, the defaults are used when not set.
    pub fn properties(mut self, properties: ReceiverProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Build the cast player.
    /// It returns an error when the surface or shell is missing.
    pub fn build(self) -> Result<CastPlayer> {
        let surface = self
            .surface
            .ok_or(PlayerError::MissingDependency("surface"))?;
        let shell = self.shell.ok_or(PlayerError::MissingDependency("shell"))?;

        Ok(CastPlayer::new(
            surface,
            shell,
            self.properties.unwrap_or_default(),
        ))
    }
}

#[derive(Debug)]
enum PlayerCommand {
    Load(LoadRequest),
    Stop,
    Pause,
    Resume,
    Seek(u64),
    SetVolume(f32),
    ToggleCaptions(CaptionMessage),
    SetState {
        state: PlayerState,
        crossfade: bool,
        delay: Option<Duration>,
    },
    /// Apply the delayed state of the given timer.
    DelayedState {
        handle: TimerHandle,
        state: PlayerState,
        crossfade: bool,
    },
    IdleTimeout(TimerHandle),
    SeekingTimeout(TimerHandle),
    ProgressTimeout(TimerHandle),
    /// The shell has been completely faded out.
    FadedOut,
    /// The shell has been completely faded in.
    FadedIn,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum FadePhase {
    Out,
    In,
}

#[derive(Debug)]
struct PlayerData {
    state: PlayerState,
    content_type: Option<ContentType>,
    /// Indicates if the current load is waiting for the image to be loaded
    awaiting_image: bool,
    fade: Option<FadePhase>,
    /// The newest crossfade target which is applied once the shell has faded out
    pending: Option<PlayerState>,
    /// Indicates if the surfaces are paused and blanked once the shell has faded out.
    /// Newer state writes never discard a requested stop.
    stopping: bool,
    idle_timer: DelayedTask,
    delay_timer: DelayedTask,
    seeking_timer: DelayedTask,
    progress_timer: DelayedTask,
}

impl PlayerData {
    fn cancel_timers(&mut self) {
        self.idle_timer.cancel();
        self.delay_timer.cancel();
        self.seeking_timer.cancel();
        self.progress_timer.cancel();
    }
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            state: PlayerState::default(),
            content_type: None,
            awaiting_image: false,
            fade: None,
            pending: None,
            stopping: false,
            idle_timer: DelayedTask::new("idle"),
            delay_timer: DelayedTask::new("delayed state"),
            seeking_timer: DelayedTask::new("seeking indicator"),
            progress_timer: DelayedTask::new("progress indicator"),
        }
    }
}

#[derive(Debug)]
struct InnerPlayer {
    surface: Arc<dyn MediaSurface>,
    shell: Arc<dyn VisualShell>,
    properties: ReceiverProperties,
    data: Mutex<PlayerData>,
    command_sender: UnboundedSender<PlayerCommand>,
    callbacks: MultiThreadedCallback<PlayerEvent>,
    cancellation_token: CancellationToken,
}

impl InnerPlayer {
    async fn start(
        &self,
        mut command_receiver: UnboundedReceiver<PlayerCommand>,
        mut surface_events: Subscription<SurfaceEvent>,
    ) {
        loop {
            select! {
                _ = self.cancellation_token.cancelled() => break,
                Some(command) = command_receiver.recv() => self.handle_command(command).await,
                Some(event) = surface_events.recv() => self.handle_surface_event(&*event).await,
            }
        }

        self.data.lock().await.cancel_timers();
        debug!("Cast player main loop ended");
    }

    async fn handle_command(&self, command: PlayerCommand) {
        trace!("Cast player is handling command {:?}", command);
        match command {
            PlayerCommand::Load(request) => self.load(request).await,
            PlayerCommand::Stop => self.stop().await,
            PlayerCommand::Pause => {
                self.surface.pause();
                self.show_progress(&mut *self.data.lock().await);
            }
            PlayerCommand::Resume => {
                self.surface.play();
                self.show_progress_briefly(&mut *self.data.lock().await);
            }
            PlayerCommand::Seek(position) => {
                self.surface.set_current_time(position as f64 / 1000.0);
                self.show_progress_briefly(&mut *self.data.lock().await);
            }
            PlayerCommand::SetVolume(level) => self.set_volume(level),
            PlayerCommand::ToggleCaptions(message) => self.toggle_captions(message),
            PlayerCommand::SetState {
                state,
                crossfade,
                delay,
            } => {
                let mut data = self.data.lock().await;
                match delay {
                    Some(delay) => self.schedule_state(&mut data, state, crossfade, delay),
                    None => self.write_state(&mut data, state, crossfade),
                }
            }
            PlayerCommand::DelayedState {
                handle,
                state,
                crossfade,
            } => {
                let mut data = self.data.lock().await;
                if data.delay_timer.expire(&handle) {
                    self.write_state(&mut data, state, crossfade);
                }
            }
            PlayerCommand::IdleTimeout(handle) => self.on_idle_timeout(handle).await,
            PlayerCommand::SeekingTimeout(handle) => {
                if self.data.lock().await.seeking_timer.expire(&handle) {
                    self.shell.set_seeking(false);
                }
            }
            PlayerCommand::ProgressTimeout(handle) => {
                if self.data.lock().await.progress_timer.expire(&handle) {
                    self.shell.set_progress_visible(false);
                }
            }
            PlayerCommand::FadedOut => self.on_faded_out().await,
            PlayerCommand::FadedIn => self.on_faded_in().await,
        }
    }

    async fn handle_surface_event(&self, event: &SurfaceEvent) {
        trace!("Cast player received surface event {}", event);
        let mut data = self.data.lock().await;

        match event {
            SurfaceEvent::Stalled => {
                self.write_state(&mut data, PlayerState::Buffering, false);

                let current_time = self.surface.current_time();
                if !current_time.is_nan() && current_time != 0.0 {
                    debug!("Cast player is reloading the stalled media at {}s", current_time);
                    self.surface.load();
                }
            }
            SurfaceEvent::Waiting => {
                if data.state != PlayerState::Loading {
                    self.write_state(&mut data, PlayerState::Buffering, false);
                }
            }
            SurfaceEvent::Playing => {
                if data.state == PlayerState::Loading {
                    let delay = self.properties.playing_delay;
                    self.schedule_state(&mut data, PlayerState::Playing, true, delay);
                } else {
                    self.write_state(&mut data, PlayerState::Playing, false);
                }

                self.show_progress_briefly(&mut data);
                self.shell.show_indicator(PlaybackIndicator::Play);
            }
            SurfaceEvent::Pause => {
                if data.state == PlayerState::Done {
                    trace!("Cast player ignoring pause event in state {}", data.state);
                    return;
                }

                self.write_state(&mut data, PlayerState::Paused, false);
                self.show_progress(&mut data);
                self.shell.show_indicator(PlaybackIndicator::Pause);
            }
            SurfaceEvent::Ended => {
                self.write_state(&mut data, PlayerState::Done, true);
                self.hide_progress(&mut data);
            }
            SurfaceEvent::TimeUpdate {
                current_time,
                duration,
            } => {
                if let Some(percentage) = progress_percentage(*current_time, *duration) {
                    let progress = Progress {
                        current_time: format_duration(*current_time),
                        total_time: format_duration(*duration),
                        percentage,
                    };

                    self.shell.update_progress(&progress);
                    self.callbacks.invoke(PlayerEvent::ProgressChanged(progress));
                }
            }
            SurfaceEvent::Seeking => {
                data.seeking_timer.cancel();
                self.shell.set_seeking(true);
                self.show_progress_briefly(&mut data);
            }
            SurfaceEvent::Seeked => {
                let delay = self.properties.seeking_indicator;
                data.seeking_timer
                    .schedule(delay, &self.command_sender, PlayerCommand::SeekingTimeout);
            }
            SurfaceEvent::Error => {
                warn!("Cast player media surface reported a playback error");
                self.write_state(&mut data, PlayerState::Done, true);
            }
            SurfaceEvent::ImageLoaded => {
                if data.awaiting_image {
                    data.awaiting_image = false;
                    self.write_state(&mut data, PlayerState::Paused, false);
                } else {
                    debug!("Cast player ignoring image loaded event, no image load is active");
                }
            }
            SurfaceEvent::VisibilityChanged { hidden } => {
                if *hidden {
                    self.surface.pause();
                } else {
                    self.surface.play();
                }
            }
        }
    }

    async fn load(&self, request: LoadRequest) {
        debug!("Cast player is loading {:?}", request);
        let metadata = MediaMetadata {
            title: non_empty(request.title()),
            subtitle: non_empty(request.subtitle()),
            artwork: non_empty(request.artwork()),
        };
        self.shell.update_metadata(&metadata);

        let mut data = self.data.lock().await;
        let content_type = ContentType::from_mime(request.content_type());
        match content_type {
            Some(content_type) if data.content_type != Some(content_type) => {
                data.content_type = Some(content_type);
                self.callbacks
                    .invoke(PlayerEvent::ContentTypeChanged(content_type));
            }
            Some(_) => {}
            None => warn!(
                "Cast player received unsupported content type \"{}\"",
                request.content_type()
            ),
        }

        data.awaiting_image = false;
        data.stopping = false;
        self.write_state(&mut data, PlayerState::Loading, false);

        let source = non_empty(request.content_id());
        match content_type {
            Some(ContentType::Image) => {
                self.surface.set_video_source(None);
                self.surface.set_image_source(source);
                data.awaiting_image = true;
                self.hide_progress(&mut data);
            }
            Some(ContentType::Video) => {
                self.surface.set_image_source(None);
                self.surface.set_autoplay(request.autoplay());
                self.surface.set_video_source(source);
                self.surface
                    .set_text_track(non_empty(request.subtitles()), TextTrackMode::Hidden);
                self.show_progress_briefly(&mut data);
            }
            None => {}
        }
        info!("Cast player loaded {}", request.content_id());
    }

    async fn stop(&self) {
        debug!("Cast player is stopping the playback");
        let mut data = self.data.lock().await;

        data.delay_timer.cancel();
        data.pending = None;
        data.stopping = true;
        if data.fade.is_none() {
            self.start_fade(&mut data, FadePhase::Out);
        }
    }

    fn set_volume(&self, level: f32) {
        let level = (level.clamp(0.0, 1.0) * 100.0).round() as u32;
        trace!("Cast player is showing volume level {}", level);
        self.shell.show_volume(level);
    }

    fn toggle_captions(&self, message: CaptionMessage) {
        match message.subtitles.filter(|e| !e.is_empty()) {
            Some(url) => {
                debug!("Cast player is showing captions {}", url);
                self.surface
                    .set_text_track(Some(url), TextTrackMode::Showing);
            }
            None => match self.surface.text_track_mode() {
                Some(mode) => {
                    let mode = mode.toggle();
                    debug!("Cast player is toggling captions to {}", mode);
                    self.surface.set_text_track_mode(mode);
                }
                None => trace!("Cast player has no captions to toggle"),
            },
        }
    }

    async fn on_idle_timeout(&self, handle: TimerHandle) {
        let mut data = self.data.lock().await;
        if !data.idle_timer.expire(&handle) {
            return;
        }

        if data.state != PlayerState::Idle {
            debug!("Cast player idled out in state {}", data.state);
            self.write_state(&mut data, PlayerState::Idle, true);
        } else {
            info!("Cast player idle timeout reached, closing the receiver session");
            data.cancel_timers();
            self.shell.close();
            self.callbacks.invoke(PlayerEvent::SessionClosed);
            self.cancellation_token.cancel();
        }
    }

    async fn on_faded_out(&self) {
        let mut data = self.data.lock().await;

        if data.stopping {
            data.stopping = false;
            self.stop_playback(&mut data);
        }
        if let Some(state) = data.pending.take() {
            self.update_state(&mut data, state);
        }
        self.start_fade(&mut data, FadePhase::In);
    }

    async fn on_faded_in(&self) {
        let mut data = self.data.lock().await;

        if data.pending.is_some() || data.stopping {
            self.start_fade(&mut data, FadePhase::Out);
        } else {
            data.fade = None;
        }
    }

    /// Write the given state to the player.
    /// Any pending delayed state is cancelled.
    fn write_state(&self, data: &mut PlayerData, state: PlayerState, crossfade: bool) {
        data.delay_timer.cancel();

        if crossfade {
            trace!("Cast player is crossfading to {}", state);
            data.pending = Some(state);
            if data.fade.is_none() {
                self.start_fade(data, FadePhase::Out);
            }
        } else {
            data.pending = None;
            self.update_state(data, state);
        }
    }

    fn schedule_state(
        &self,
        data: &mut PlayerData,
        state: PlayerState,
        crossfade: bool,
        delay: Duration,
    ) {
        trace!("Cast player is delaying {} by {:?}", state, delay);
        data.pending = None;
        data.delay_timer
            .schedule(delay, &self.command_sender, |handle| {
                PlayerCommand::DelayedState {
                    handle,
                    state,
                    crossfade,
                }
            });
    }

    /// Pause and blank both surfaces, the player transitions to [PlayerState::Done].
    fn stop_playback(&self, data: &mut PlayerData) {
        self.surface.pause();
        self.surface.set_video_source(None);
        self.surface.set_image_source(None);
        data.awaiting_image = false;
        self.hide_progress(data);

        self.update_state(data, PlayerState::Done);
    }

    fn update_state(&self, data: &mut PlayerData, state: PlayerState) {
        data.idle_timer.cancel();
        data.state = state;
        self.shell.update_marker(&PlayerMarker {
            content_type: data.content_type,
            state,
        });

        if let Some(timeout) = self.properties.idle_timeouts.get(&state) {
            data.idle_timer
                .schedule(timeout, &self.command_sender, PlayerCommand::IdleTimeout);
        }

        debug!("Cast player state changed to {}", state);
        self.callbacks.invoke(PlayerEvent::StateChanged(state));
    }

    fn start_fade(&self, data: &mut PlayerData, phase: FadePhase) {
        data.fade = Some(phase);

        let shell = self.shell.clone();
        let sender = self.command_sender.clone();
        let duration = self.properties.crossfade;
        let cancellation_token = self.cancellation_token.clone();
        tokio::spawn(async move {
            let command = match phase {
                FadePhase::Out => select! {
                    _ = cancellation_token.cancelled() => return,
                    _ = shell.fade_out(duration) => PlayerCommand::FadedOut,
                },
                FadePhase::In => select! {
                    _ = cancellation_token.cancelled() => return,
                    _ = shell.fade_in(duration) => PlayerCommand::FadedIn,
                },
            };

            if let Err(e) = sender.send(command) {
                debug!("Cast player failed to complete fade {:?}, {}", phase, e);
            }
        });
    }

    fn show_progress(&self, data: &mut PlayerData) {
        data.progress_timer.cancel();
        self.shell.set_progress_visible(true);
    }

    fn show_progress_briefly(&self, data: &mut PlayerData) {
        let delay = self.properties.progress_indicator;
        data.progress_timer
            .schedule(delay, &self.command_sender, PlayerCommand::ProgressTimeout);
        self.shell.set_progress_visible(true);
    }

    fn hide_progress(&self, data: &mut PlayerData) {
        data.progress_timer.cancel();
        self.shell.set_progress_visible(false);
    }

    fn send_command(&self, command: PlayerCommand) {
        if let Err(e) = self.command_sender.send(command) {
            debug!("Cast player failed to send command, {}", e);
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
