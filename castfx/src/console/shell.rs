use async_trait::async_trait;
use castfx_core::core::surface::{
    MediaMetadata, PlaybackIndicator, PlayerMarker, Progress, VisualShell,
};
use log::{debug, info};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// A headless visual shell which renders the player view to the log.
#[derive(Debug, Default)]
pub struct ConsoleShell {
    view: Mutex<ShellView>,
    cancellation_token: CancellationToken,
}

#[derive(Debug, Default)]
struct ShellView {
    marker: String,
    metadata: MediaMetadata,
    progress: Option<Progress>,
    progress_visible: bool,
    seeking: bool,
}

impl ShellView {
    /// The rendered progress bar line, if the progress bar is visible.
    fn status_line(&self) -> Option<String> {
        if !self.progress_visible {
            return None;
        }

        self.progress.as_ref().map(|progress| {
            let title = self.metadata.title.as_deref().unwrap_or("untitled");
            format!(
                "[{}] {} {}{}",
                self.marker,
                title,
                progress,
                if self.seeking { " seeking" } else { "" }
            )
        })
    }
}

impl ConsoleShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a future which resolves when the receiver session has been closed.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.cancellation_token.cancelled()
    }

    pub fn is_closed(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Get the current player marker of the shell.
    pub fn marker(&self) -> String {
        self.view().marker.clone()
    }

    #[cfg(test)]
    pub fn is_progress_visible(&self) -> bool {
        self.view().progress_visible
    }

    fn render_progress(&self, view: &ShellView) {
        if let Some(line) = view.status_line() {
            debug!("{}", line);
        }
    }

    fn view(&self) -> MutexGuard<'_, ShellView> {
        self.view.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl VisualShell for ConsoleShell {
    fn update_marker(&self, marker: &PlayerMarker) {
        info!("[{}]", marker);
        self.view().marker = marker.to_string();
    }

    fn update_metadata(&self, metadata: &MediaMetadata) {
        info!(
            "Now showing {} {}",
            metadata.title.as_deref().unwrap_or_default(),
            metadata.subtitle.as_deref().unwrap_or_default()
        );
        self.view().metadata = metadata.clone();
    }

    fn update_progress(&self, progress: &Progress) {
        let mut view = self.view();
        view.progress = Some(progress.clone());
        self.render_progress(&view);
    }

    fn set_seeking(&self, seeking: bool) {
        self.view().seeking = seeking;
    }

    fn set_progress_visible(&self, visible: bool) {
        let mut view = self.view();
        view.progress_visible = visible;
        self.render_progress(&view);
    }

    fn show_indicator(&self, indicator: PlaybackIndicator) {
        info!("[{}] {}", self.view().marker, indicator);
    }

    fn show_volume(&self, level: u32) {
        info!("Volume {}%", level);
    }

    async fn fade_out(&self, duration: Duration) {
        debug!("Fading out over {:?}", duration);
        time::sleep(duration).await;
    }

    async fn fade_in(&self, duration: Duration) {
        debug!("Fading in over {:?}", duration);
        time::sleep(duration).await;
    }

    fn close(&self) {
        info!("Closing the receiver session");
        self.cancellation_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use castfx_core::core::players::{ContentType, PlayerState};
    use castfx_core::init_logger;
    use tokio::time::Instant;

    #[test]
    fn test_update_marker() {
        init_logger!();
        let shell = ConsoleShell::new();

        shell.update_marker(&PlayerMarker {
            content_type: Some(ContentType::Image),
            state: PlayerState::Paused,
        });

        assert_eq!("player image paused", shell.marker());
    }

    #[test]
    fn test_set_progress_visible() {
        init_logger!();
        let shell = ConsoleShell::new();

        shell.set_progress_visible(true);
        assert_eq!(true, shell.is_progress_visible());

        shell.set_progress_visible(false);
        assert_eq!(false, shell.is_progress_visible());
    }

    #[test]
    fn test_status_line() {
        init_logger!();
        let shell = ConsoleShell::new();
        shell.update_marker(&PlayerMarker {
            content_type: Some(ContentType::Video),
            state: PlayerState::Playing,
        });
        shell.update_metadata(&MediaMetadata {
            title: Some("Big Buck Bunny".to_string()),
            subtitle: None,
            artwork: None,
        });
        shell.update_progress(&Progress {
            current_time: "00:30".to_string(),
            total_time: "01:00".to_string(),
            percentage: 50.0,
        });
        assert_eq!(None, shell.view().status_line());

        shell.set_progress_visible(true);
        shell.set_seeking(true);

        assert_eq!(
            Some("[player video playing] Big Buck Bunny 00:30/01:00 (50.0%) seeking".to_string()),
            shell.view().status_line()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fade_out() {
        init_logger!();
        let shell = ConsoleShell::new();
        let start = Instant::now();

        shell.fade_out(Duration::from_millis(750)).await;

        assert!(start.elapsed() >= Duration::from_millis(750));
    }

    #[tokio::test]
    async fn test_close() {
        init_logger!();
        let shell = ConsoleShell::new();
        assert_eq!(false, shell.is_closed());

        shell.close();

        shell.closed().await;
        assert_eq!(true, shell.is_closed());
    }
}
