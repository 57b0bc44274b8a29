use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Full-scale value of a signed 16-bit sample.
const I16_SCALE: f32 = 32768.0;

/// Layout of raw PCM returned by speech synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcmFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self {
            sample_rate: 24_000,
            channels: 1,
        }
    }
}

impl PcmFormat {
    /// Bytes in one complete frame across all channels.
    pub fn frame_bytes(&self) -> usize {
        self.channels as usize * 2
    }
}

/// De-interleaved float audio, one sample vector per channel, values in
/// [-1.0, 1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Build from per-channel samples. All channels must have equal length.
    pub fn from_channels(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, DomainError> {
        if channels.is_empty() {
            return Err(DomainError::Decode("At least one channel is required".to_string()));
        }
        let frames = channels[0].len();
        if channels.iter().any(|c| c.len() != frames) {
            return Err(DomainError::Decode("Channels differ in length".to_string()));
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f32 / self.sample_rate as f32
    }

    /// Nothing to play.
    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }
}

/// Decode base64 signed 16-bit little-endian interleaved PCM.
///
/// A trailing odd byte or a partial frame at the end is dropped. An empty
/// payload yields a zero-frame buffer.
pub fn decode_base64_pcm(payload: &str, format: PcmFormat) -> Result<DecodedAudio, DomainError> {
    if format.channels == 0 {
        return Err(DomainError::Decode("Channel count must be at least 1".to_string()));
    }

    let bytes = STANDARD.decode(payload.trim())?;
    decode_pcm_bytes(&bytes, format)
}

/// Decode raw interleaved PCM bytes.
pub fn decode_pcm_bytes(bytes: &[u8], format: PcmFormat) -> Result<DecodedAudio, DomainError> {
    if format.channels == 0 {
        return Err(DomainError::Decode("Channel count must be at least 1".to_string()));
    }

    let channel_count = format.channels as usize;
    let frame_count = bytes.len() / format.frame_bytes();
    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];

    for frame in bytes.chunks_exact(format.frame_bytes()) {
        for (c, sample) in frame.chunks_exact(2).enumerate() {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            channels[c].push(value as f32 / I16_SCALE);
        }
    }

    Ok(DecodedAudio {
        sample_rate: format.sample_rate,
        channels,
    })
}

/// Encode float audio back to base64 interleaved 16-bit PCM.
/// Samples are clamped to [-1.0, 1.0] and saturate at the i16 limits.
pub fn encode_pcm_base64(audio: &DecodedAudio) -> String {
    let mut bytes = Vec::with_capacity(audio.frame_count() * audio.channel_count() * 2);
    for i in 0..audio.frame_count() {
        for channel in &audio.channels {
            let scaled = (channel[i].clamp(-1.0, 1.0) * I16_SCALE).round();
            let value = scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    STANDARD.encode(bytes)
}

/// Playback state of the audio player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Idle,
    Playing,
}
