use crate::bus::{BusMessage, MessageHandler, Result};
use crate::console::ConsoleSurface;

use async_trait::async_trait;
use castfx_core::core::surface::SurfaceEvent;
use derive_more::Display;
use serde::Deserialize;
use std::sync::Arc;

/// The host local namespace which simulates the events of the media surface.
pub const SURFACE_NAMESPACE: &str = "urn:x-cast:castfx.surface";

/// The simulated surface event messages, e.g. `{"event": "timeupdate", "currentTime": 12.0, "duration": 60.0}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum SurfaceMessage {
    Stalled,
    Waiting,
    Playing,
    Pause,
    Ended,
    TimeUpdate {
        #[serde(rename = "currentTime")]
        current_time: f64,
        duration: f64,
    },
    Seeking,
    Seeked,
    Error,
    #[serde(rename = "imageload")]
    ImageLoaded,
    VisibilityChange {
        #[serde(default)]
        hidden: bool,
    },
}

impl From<SurfaceMessage> for SurfaceEvent {
    fn from(value: SurfaceMessage) -> Self {
        match value {
            SurfaceMessage::Stalled => SurfaceEvent::Stalled,
            SurfaceMessage::Waiting => SurfaceEvent::Waiting,
            SurfaceMessage::Playing => SurfaceEvent::Playing,
            SurfaceMessage::Pause => SurfaceEvent::Pause,
            SurfaceMessage::Ended => SurfaceEvent::Ended,
            SurfaceMessage::TimeUpdate {
                current_time,
                duration,
            } => SurfaceEvent::TimeUpdate {
                current_time,
                duration,
            },
            SurfaceMessage::Seeking => SurfaceEvent::Seeking,
            SurfaceMessage::Seeked => SurfaceEvent::Seeked,
            SurfaceMessage::Error => SurfaceEvent::Error,
            SurfaceMessage::ImageLoaded => SurfaceEvent::ImageLoaded,
            SurfaceMessage::VisibilityChange { hidden } => {
                SurfaceEvent::VisibilityChanged { hidden }
            }
        }
    }
}

/// The message handler which injects simulated events into the console surface.
#[derive(Debug, Display)]
#[display("surface")]
pub struct SurfaceMessageHandler {
    surface: Arc<ConsoleSurface>,
}

impl SurfaceMessageHandler {
    pub fn new(surface: Arc<ConsoleSurface>) -> Self {
        Self { surface }
    }
}

#[async_trait]
impl MessageHandler for SurfaceMessageHandler {
    fn is_supported(&self, namespace: &str) -> bool {
        namespace == SURFACE_NAMESPACE
    }

    async fn process(&self, message: BusMessage) -> Result<()> {
        let message = message.data_as::<SurfaceMessage>()?;
        self.surface.simulate(SurfaceEvent::from(message));
        Ok(())
    }
}
