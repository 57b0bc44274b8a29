use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::domain::{DecodedAudio, DomainError, PlaybackState};
use crate::ports::AudioSink;

type SinkFactory = Box<dyn Fn() -> Result<Arc<dyn AudioSink>, DomainError> + Send + Sync>;

/// Plays decoded speech on a single, lazily opened output sink.
///
/// Starting a new playback stops the active one first; there is no queue.
pub struct AudioPlayer {
    factory: SinkFactory,
    sink: OnceCell<Arc<dyn AudioSink>>,
    state: Mutex<PlaybackState>,
}

impl AudioPlayer {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn AudioSink>, DomainError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            sink: OnceCell::new(),
            state: Mutex::new(PlaybackState::Idle),
        }
    }

    fn sink(&self) -> Result<&Arc<dyn AudioSink>, DomainError> {
        self.sink.get_or_try_init(|| {
            info!("Opening audio output");
            (self.factory)()
        })
    }

    /// Play a buffer, replacing whatever is playing.
    ///
    /// Returns `false` without touching the sink when the buffer is empty.
    pub fn play(&self, audio: &DecodedAudio) -> Result<bool, DomainError> {
        if audio.is_empty() {
            debug!("Empty audio buffer, nothing to play");
            return Ok(false);
        }

        let sink = self.sink()?;
        let mut state = self.state.lock();
        if *state == PlaybackState::Playing && sink.is_playing() {
            sink.stop();
        }

        match sink.play(audio) {
            Ok(()) => {
                *state = PlaybackState::Playing;
                debug!(
                    frames = audio.frame_count(),
                    duration_secs = audio.duration_secs(),
                    "Playback started"
                );
                Ok(true)
            }
            Err(e) => {
                *state = PlaybackState::Idle;
                Err(e)
            }
        }
    }

    pub fn stop(&self) {
        let mut state = self.state.lock();
        if *state == PlaybackState::Playing {
            if let Some(sink) = self.sink.get() {
                sink.stop();
            }
            *state = PlaybackState::Idle;
        }
    }

    /// Current state. A buffer that has played out reports `Idle`.
    pub fn state(&self) -> PlaybackState {
        let mut state = self.state.lock();
        if *state == PlaybackState::Playing
            && !self.sink.get().is_some_and(|sink| sink.is_playing())
        {
            *state = PlaybackState::Idle;
        }
        *state
    }
}
