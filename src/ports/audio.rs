use crate::domain::{DecodedAudio, DomainError};

/// Port for the platform audio output device.
///
/// Implementations schedule a decoded buffer for playback. The player
/// creates one sink lazily and reuses it for every playback request.
pub trait AudioSink: Send + Sync {
    /// Start playing the buffer from the beginning.
    fn play(&self, audio: &DecodedAudio) -> Result<(), DomainError>;

    /// Stop the active playback, if any.
    fn stop(&self);

    /// Whether a buffer is still playing. Turns false once it plays out.
    fn is_playing(&self) -> bool;
}
