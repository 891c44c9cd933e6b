use crate::core::players::PlayerState;
use crate::core::utils::time::deserialize_optional_millis;

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT: fn() -> Option<Duration> = || Some(Duration::from_secs(30));
const DEFAULT_LOADING_TIMEOUT: fn() -> Option<Duration> = || Some(Duration::from_secs(3000));

/// The amount of time the player may remain within a state before it goes idle.
///
/// A state without a timeout never idles out, e.g. while the media is playing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdleTimeouts {
    #[serde(default = "DEFAULT_TIMEOUT", deserialize_with = "deserialize_optional_millis")]
    pub launching: Option<Duration>,
    #[serde(
        default = "DEFAULT_LOADING_TIMEOUT",
        deserialize_with = "deserialize_optional_millis"
    )]
    pub loading: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_optional_millis")]
    pub buffering: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_optional_millis")]
    pub playing: Option<Duration>,
    #[serde(default = "DEFAULT_TIMEOUT", deserialize_with = "deserialize_optional_millis")]
    pub paused: Option<Duration>,
    #[serde(default = "DEFAULT_TIMEOUT", deserialize_with = "deserialize_optional_millis")]
    pub stalled: Option<Duration>,
    #[serde(default = "DEFAULT_TIMEOUT", deserialize_with = "deserialize_optional_millis")]
    pub done: Option<Duration>,
    #[serde(default = "DEFAULT_TIMEOUT", deserialize_with = "deserialize_optional_millis")]
    pub idle: Option<Duration>,
}

impl IdleTimeouts {
    /// Get the idle timeout of the given state.
    ///
    /// It returns [None] when the state doesn't idle out.
    pub fn get(&self, state: &PlayerState) -> Option<Duration> {
        match state {
            PlayerState::Launching => self.launching,
            PlayerState::Loading => self.loading,
            PlayerState::Buffering => self.buffering,
            PlayerState::Playing => self.playing,
            PlayerState::Paused => self.paused,
            PlayerState::Stalled => self.stalled,
            PlayerState::Done => self.done,
            PlayerState::Idle => self.idle,
        }
        .filter(|e| !e.is_zero())
    }
}

impl Default for IdleTimeouts {
    fn default() -> Self {
        Self {
            launching: DEFAULT_TIMEOUT(),
            loading: DEFAULT_LOADING_TIMEOUT(),
            buffering: None,
            playing: None,
            paused: DEFAULT_TIMEOUT(),
            stalled: DEFAULT_TIMEOUT(),
            done: DEFAULT_TIMEOUT(),
            idle: DEFAULT_TIMEOUT(),
        }
    }
}
