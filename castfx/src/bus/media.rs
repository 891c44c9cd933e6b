use crate::bus::{BusMessage, MessageHandler, Result};

use async_trait::async_trait;
use castfx_core::core::players::{CastPlayer, LoadRequest};
use derive_more::Display;
use log::{debug, trace};
use serde::Deserialize;
use std::sync::Arc;

/// The namespace of the cast media channel.
pub const MEDIA_NAMESPACE: &str = "urn:x-cast:com.google.cast.media";

/// The commands received on the cast media channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaMessage {
    Load(LoadRequest),
    Stop,
    Pause,
    Play,
    Seek {
        /// The new playback position in seconds.
        #[serde(rename = "currentTime", default)]
        current_time: f64,
    },
    SetVolume {
        #[serde(default)]
        volume: Volume,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Volume {
    #[serde(default)]
    pub level: Option<f32>,
    #[serde(default)]
    pub muted: Option<bool>,
}

/// The message handler of the cast media channel.
#[derive(Debug, Display)]
#[display("media")]
pub struct MediaMessageHandler {
    player: Arc<CastPlayer>,
}

impl MediaMessageHandler {
    pub fn new(player: Arc<CastPlayer>) -> Self {
        Self { player }
    }
}

#[async_trait]
impl MessageHandler for MediaMessageHandler {
    fn is_supported(&self, namespace: &str) -> bool {
        namespace == MEDIA_NAMESPACE
    }

    async fn process(&self, message: BusMessage) -> Result<()> {
        let message = message.data_as::<MediaMessage>()?;
        trace!("Processing media message {:?}", message);

        match message {
            MediaMessage::Load(request) => self.player.load(request),
            MediaMessage::Stop => self.player.stop(),
            MediaMessage::Pause => self.player.pause(),
            MediaMessage::Play => self.player.resume(),
            MediaMessage::Seek { current_time } => {
                let position = (current_time.max(0.0) * 1000.0).round() as u64;
                self.player.seek(position);
            }
            MediaMessage::SetVolume { volume } => {
                if volume.muted.unwrap_or(false) {
                    self.player.set_volume(0.0);
                } else if let Some(level) = volume.level {
                    self.player.set_volume(level);
                } else {
                    debug!("Ignoring volume message without level");
                }
            }
        }

        Ok(())
    }
}
