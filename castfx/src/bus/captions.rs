use crate::bus::{BusMessage, MessageHandler, Result};

use async_trait::async_trait;
use castfx_core::core::players::{CastPlayer, CaptionMessage};
use derive_more::Display;
use std::sync::Arc;

/// The namespace of the custom caption channel.
pub const CAPTIONS_NAMESPACE: &str = "urn:x-cast:com.koushikdutta.cast";

/// The message handler of the caption channel.
/// Invalid caption payloads toggle the current captions.
#[derive(Debug, Display)]
#[display("captions")]
pub struct CaptionMessageHandler {
    player: Arc<CastPlayer>,
}

impl CaptionMessageHandler {
    pub fn new(player: Arc<CastPlayer>) -> Self {
        Self { player }
    }
}

#[async_trait]
impl MessageHandler for CaptionMessageHandler {
    fn is_supported(&self, namespace: &str) -> bool {
        namespace == CAPTIONS_NAMESPACE
    }

    async fn process(&self, message: BusMessage) -> Result<()> {
        let message = CaptionMessage::from_payload(message.payload().as_str());
        self.player.toggle_captions(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::console::{ConsoleShell, ConsoleSurface};

    use castfx_core::core::config::ReceiverProperties;
    use castfx_core::core::surface::{MediaSurface, TextTrackMode};
    use castfx_core::{assert_timeout_eq, init_logger};
    use serde_json::{json, Value};
    use std::time::Duration;

    #[tokio::test]
    async fn test_process() {
        init_logger!();
        let surface = Arc::new(ConsoleSurface::new());
        let player = Arc::new(CastPlayer::new(
            surface.clone(),
            Arc::new(ConsoleShell::new()),
            ReceiverProperties::default(),
        ));
        let handler = CaptionMessageHandler::new(player);

        let result = handler
            .process(BusMessage {
                namespace: CAPTIONS_NAMESPACE.to_string(),
                data: json!({"subtitles": "http://localhost/en.vtt"}),
            })
            .await;
        assert_eq!(Ok(()), result);
        assert_timeout_eq!(
            Duration::from_millis(200),
            Some(TextTrackMode::Showing),
            surface.text_track_mode()
        );

        let result = handler
            .process(BusMessage {
                namespace: CAPTIONS_NAMESPACE.to_string(),
                data: Value::String("lorem".to_string()),
            })
            .await;
        assert_eq!(Ok(()), result);
        assert_timeout_eq!(
            Duration::from_millis(200),
            Some(TextTrackMode::Hidden),
            surface.text_track_mode()
        );
    }
}
