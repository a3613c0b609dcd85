//! Immutable multi-channel PCM buffer.
//!
//! [`SampleBuffer`] is what the decoder produces and what every pipeline
//! stage consumes.  Samples are stored planar (one `Vec<f64>` per channel)
//! so the filter can walk each channel independently.
//!
//! # Example
//!
//! ```rust
//! use audio_to_hex::audio::SampleBuffer;
//!
//! // L R L R
//! let buf = SampleBuffer::from_interleaved(&[0.5_f32, -0.5, 0.25, -0.25], 2, 44_100).unwrap();
//! assert_eq!(buf.channel_count(), 2);
//! assert_eq!(buf.frame_count(), 2);
//! assert_eq!(buf.channel(1), Some(&[-0.5, -0.25][..]));
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// A [`SampleBuffer`] could not be built because its shape is invalid.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BufferError {
    /// At least one channel is required.
    #[error("sample buffer has no channels")]
    NoChannels,

    /// The sample rate must be positive.
    #[error("sample rate must be greater than 0 Hz")]
    ZeroSampleRate,

    /// Channels disagree on the number of frames.
    #[error("channel {channel} has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        got: usize,
    },

    /// Interleaved input length is not a multiple of the channel count.
    #[error("{len} interleaved samples cannot be split into {channels} channels")]
    RaggedInterleave { len: usize, channels: usize },
}

// ---------------------------------------------------------------------------
// SampleBuffer
// ---------------------------------------------------------------------------

/// Decoded PCM audio: one or more equally long channels of `f64` samples at
/// a fixed sample rate.
///
/// The buffer is never mutated after construction.  Each pipeline stage reads
/// it and returns a fresh buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f64>>,
    sample_rate: u32,
    frame_count: usize,
}

impl SampleBuffer {
    /// Build a buffer from planar channel data.
    ///
    /// # Errors
    ///
    /// - [`BufferError::NoChannels`] when `channels` is empty.
    /// - [`BufferError::ZeroSampleRate`] when `sample_rate == 0`.
    /// - [`BufferError::ChannelLengthMismatch`] when channel lengths differ.
    pub fn new(channels: Vec<Vec<f64>>, sample_rate: u32) -> Result<Self, BufferError> {
        if channels.is_empty() {
            return Err(BufferError::NoChannels);
        }
        if sample_rate == 0 {
            return Err(BufferError::ZeroSampleRate);
        }

        let frame_count = channels[0].len();
        if let Some((channel, ch)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != frame_count)
        {
            return Err(BufferError::ChannelLengthMismatch {
                channel,
                expected: frame_count,
                got: ch.len(),
            });
        }

        Ok(Self {
            channels,
            sample_rate,
            frame_count,
        })
    }

    /// Single-channel buffer.
    pub fn mono(samples: Vec<f64>, sample_rate: u32) -> Result<Self, BufferError> {
        Self::new(vec![samples], sample_rate)
    }

    /// De-interleave `samples` (`[c0, c1, …, c0, c1, …]`) into planar channels.
    pub fn from_interleaved(
        samples: &[f32],
        channels: usize,
        sample_rate: u32,
    ) -> Result<Self, BufferError> {
        if channels == 0 {
            return Err(BufferError::NoChannels);
        }
        if samples.len() % channels != 0 {
            return Err(BufferError::RaggedInterleave {
                len: samples.len(),
                channels,
            });
        }

        let frames = samples.len() / channels;
        let mut planar: Vec<Vec<f64>> = (0..channels)
            .map(|_| Vec::with_capacity(frames))
            .collect();

        for frame in samples.chunks_exact(channels) {
            for (ch, &s) in planar.iter_mut().zip(frame) {
                ch.push(f64::from(s));
            }
        }

        Self::new(planar, sample_rate)
    }

    /// `frames` frames of digital silence on `channels` channels.
    pub fn silence(channels: usize, sample_rate: u32, frames: usize) -> Result<Self, BufferError> {
        Self::new(vec![vec![0.0; frames]; channels], sample_rate)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples in every channel.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// All channels, in order.
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.channels
    }

    /// Samples of channel `index`, or `None` if out of range.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    /// `true` when the buffer holds zero frames.
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / f64::from(self.sample_rate)
    }

    /// Consume the buffer and return its planar channel data.
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_equal_length_channels() {
        let buf = SampleBuffer::new(vec![vec![0.0; 4], vec![1.0; 4]], 48_000).unwrap();
        assert_eq!(buf.channel_count(), 2);
        assert_eq!(buf.frame_count(), 4);
        assert_eq!(buf.sample_rate(), 48_000);
    }

    #[test]
    fn new_rejects_no_channels() {
        assert_eq!(
            SampleBuffer::new(Vec::new(), 8_000).unwrap_err(),
            BufferError::NoChannels
        );
    }

    #[test]
    fn new_rejects_zero_rate() {
        assert_eq!(
            SampleBuffer::mono(vec![0.0], 0).unwrap_err(),
            BufferError::ZeroSampleRate
        );
    }

    #[test]
    fn new_rejects_mismatched_channels() {
        let err = SampleBuffer::new(vec![vec![0.0; 3], vec![0.0; 2]], 8_000).unwrap_err();
        assert_eq!(
            err,
            BufferError::ChannelLengthMismatch {
                channel: 1,
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn zero_frames_is_a_valid_but_empty_buffer() {
        let buf = SampleBuffer::mono(Vec::new(), 44_100).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.duration_secs(), 0.0);
    }

    #[test]
    fn from_interleaved_splits_channels() {
        let buf = SampleBuffer::from_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 8_000).unwrap();
        assert_eq!(buf.frame_count(), 2);
        assert_eq!(buf.channel(0), Some(&[1.0, 4.0][..]));
        assert_eq!(buf.channel(1), Some(&[2.0, 5.0][..]));
        assert_eq!(buf.channel(2), Some(&[3.0, 6.0][..]));
        assert_eq!(buf.channel(3), None);
    }

    #[test]
    fn from_interleaved_rejects_ragged_input() {
        let err = SampleBuffer::from_interleaved(&[1.0, 2.0, 3.0], 2, 8_000).unwrap_err();
        assert!(matches!(err, BufferError::RaggedInterleave { len: 3, channels: 2 }));
    }

    #[test]
    fn duration_follows_rate() {
        let buf = SampleBuffer::silence(2, 16_000, 8_000).unwrap();
        assert!((buf.duration_secs() - 0.5).abs() < 1e-12);
    }
}
