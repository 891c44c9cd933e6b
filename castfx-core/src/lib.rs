/// The current version of the castfx receiver.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod core;

#[cfg(feature = "testing")]
pub mod testing {
    use crate::core::players::{CastPlayer, PlayerEvent};
    use crate::core::surface::{
        MediaMetadata, MediaSurface, PlaybackIndicator, PlayerMarker, Progress, SurfaceEvent,
        TextTrackMode, VisualShell,
    };

    use async_trait::async_trait;
    use fx_callback::{Callback, Subscriber, Subscription};
    use log::LevelFilter;
    use log4rs::append::console::ConsoleAppender;
    use log4rs::config::{Appender, Logger, Root};
    use log4rs::encode::pattern::PatternEncoder;
    use log4rs::Config;
    use mockall::mock;
    use std::sync::Once;
    use std::time::Duration;
    use tokio::select;
    use tokio::sync::mpsc::UnboundedReceiver;

    static INIT: Once = Once::new();

    /// Initializes the logger with the specified log level.
    #[macro_export]
    macro_rules! init_logger {
        ($level:expr) => {
            $crate::testing::init_logger_level($level)
        };
        () => {
            $crate::testing::init_logger_level(log::LevelFilter::Trace)
        };
    }

    /// Initializes the logger with the specified log level.
    pub fn init_logger_level(level: LevelFilter) {
        INIT.call_once(|| {
            log4rs::init_config(Config::builder()
                .appender(Appender::builder().build("stdout", Box::new(ConsoleAppender::builder()
                    .encoder(Box::new(PatternEncoder::new("\x1B[37m{d(%Y-%m-%d %H:%M:%S%.3f)}\x1B[0m {h({l:>5.5})} \x1B[37m---\x1B[0m \x1B[37m[{T:>15.15}]\x1B[0m \x1B[36m{t:<60.60}\x1B[0m \x1B[37m:\x1B[0m {m}{n}")))
                    .build())))
                .logger(Logger::builder().build("fx_callback", LevelFilter::Info))
                .logger(Logger::builder().build("mio", LevelFilter::Info))
                .logger(Logger::builder().build("tracing", LevelFilter::Info))
                .build(Root::builder().appender("stdout").build(level))
                .unwrap())
                .unwrap();
        })
    }

    mock! {
        #[derive(Debug)]
        pub MediaSurface {}

        impl MediaSurface for MediaSurface {
            fn play(&self);
            fn pause(&self);
            fn load(&self);
            fn current_time(&self) -> f64;
            fn set_current_time(&self, time: f64);
            fn set_autoplay(&self, autoplay: bool);
            fn set_video_source(&self, source: Option<String>);
            fn set_image_source(&self, source: Option<String>);
            fn set_text_track(&self, source: Option<String>, mode: TextTrackMode);
            fn text_track_mode(&self) -> Option<TextTrackMode>;
            fn set_text_track_mode(&self, mode: TextTrackMode);
        }

        impl Callback<SurfaceEvent> for MediaSurface {
            fn subscribe(&self) -> Subscription<SurfaceEvent>;
            fn subscribe_with(&self, subscriber: Subscriber<SurfaceEvent>);
        }
    }

    mock! {
        #[derive(Debug)]
        pub VisualShell {}

        #[async_trait]
        impl VisualShell for VisualShell {
            fn update_marker(&self, marker: &PlayerMarker);
            fn update_metadata(&self, metadata: &MediaMetadata);
            fn update_progress(&self, progress: &Progress);
            fn set_seeking(&self, seeking: bool);
            fn set_progress_visible(&self, visible: bool);
            fn show_indicator(&self, indicator: PlaybackIndicator);
            fn show_volume(&self, level: u32);
            async fn fade_out(&self, duration: Duration);
            async fn fade_in(&self, duration: Duration);
            fn close(&self);
        }
    }

    /// Subscribe to the [PlayerEvent::StateChanged] events of the given player.
    ///
    /// It returns a receiver which only receives the new states of the player.
    pub fn subscribe_states(
        player: &CastPlayer,
    ) -> UnboundedReceiver<crate::core::players::PlayerState> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut receiver = player.subscribe();

        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                if let PlayerEvent::StateChanged(state) = &*event {
                    if tx.send(*state).is_err() {
                        break;
                    }
                }
            }
        });

        rx
    }

    #[macro_export]
    macro_rules! assert_timeout_eq {
        ($timeout:expr, $left:expr, $right:expr) => {{
            let mut actual_value = $right;
            let result = tokio::select! {
                _ = tokio::time::sleep($timeout) => false,
                result = async {
                    loop {
                        actual_value = $right;
                        if $left == actual_value {
                            return true;
                        }

                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    }
                } => result,
            };

            if !result {
                assert!(
                    false,
                    "Assertion timed out after {:?}, expected {:?} but got {:?} instead",
                    $timeout, $left, actual_value
                );
            }
        }};
    }

    /// Receive a message from the given receiver, or panic if the timeout is reached.
    #[macro_export]
    macro_rules! recv_timeout {
        ($receiver:expr, $timeout:expr) => {
            $crate::testing::recv_timeout($receiver, $timeout, "expected to receive an instance")
                .await
        };
        ($receiver:expr, $timeout:expr, $message:expr) => {
            $crate::testing::recv_timeout($receiver, $timeout, $message).await
        };
    }

    /// Receive a message from the given receiver, or panic if the timeout is reached.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiver to receive the message from.
    /// * `timeout` - The timeout to wait for the message.
    /// * `message` - The message to print if the timeout is reached.
    pub async fn recv_timeout<T>(
        receiver: &mut UnboundedReceiver<T>,
        timeout: Duration,
        message: &str,
    ) -> T {
        select! {
            _ = tokio::time::sleep(timeout) => panic!("receiver timed-out after {}ms, {}", timeout.as_millis(), message),
            result = receiver.recv() => result.expect(message)
        }
    }
}
