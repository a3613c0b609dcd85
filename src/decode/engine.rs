//! Decoder trait and implementations.
//!
//! # Overview
//!
//! [`Decoder`] is the interface used by the conversion job.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn Decoder>` and moved onto the blocking thread pool.
//!
//! [`SymphoniaDecoder`] is the production implementation.  It probes the
//! container, decodes the first audio track and de-interleaves the result
//! into a [`SampleBuffer`].
//!
//! [`MockDecoder`] (available under `#[cfg(test)]`) returns a pre-configured
//! response and counts how often it was called.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer as PacketBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::audio::{BufferError, SampleBuffer};
use crate::decode::MediaType;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// All errors that can arise while decoding.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// The bytes are not a container the probe recognises.
    #[error("unrecognised container: {0}")]
    Probe(String),

    /// The container holds no decodable audio track.
    #[error("no audio track found")]
    NoAudioTrack,

    /// The codec could not be opened or failed fatally.
    #[error("codec error: {0}")]
    Codec(String),

    /// Reading packets from the container failed.
    #[error("read error: {0}")]
    Read(String),

    /// Neither the track nor any packet reported a sample rate.
    #[error("stream does not declare a sample rate")]
    MissingSampleRate,

    /// The decoded samples did not form a valid buffer.
    #[error("invalid decoded audio: {0}")]
    InvalidBuffer(#[from] BufferError),
}

// ---------------------------------------------------------------------------
// Decoder trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for audio decoders.
///
/// # Contract
///
/// - `bytes` is the complete encoded file.
/// - `media_type` has already been checked against the supported set.
/// - A stream with no audio frames decodes to an empty buffer, not an error;
///   the pipeline rejects it as empty input.
pub trait Decoder: Send + Sync {
    /// Decode `bytes` into linear PCM.
    fn decode(&self, bytes: &[u8], media_type: MediaType) -> Result<SampleBuffer, DecodeError>;
}

// Compile-time assertion: Box<dyn Decoder> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Decoder>) {}
};

// ---------------------------------------------------------------------------
// SymphoniaDecoder
// ---------------------------------------------------------------------------

/// Production decoder backed by `symphonia` (WAV, MP3, Ogg Vorbis, FLAC,
/// AAC/ALAC in MP4).
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for SymphoniaDecoder {
    fn decode(&self, bytes: &[u8], media_type: MediaType) -> Result<SampleBuffer, DecodeError> {
        let source = Cursor::new(bytes.to_vec());
        let mss = MediaSourceStream::new(Box::new(source), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(media_type.extension());
        hint.mime_type(media_type.as_str());

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::Probe(e.to_string()))?;
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoAudioTrack)?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count());

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::Codec(e.to_string()))?;

        let mut interleaved: Vec<f32> = Vec::new();
        let mut skipped = 0usize;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break;
                }
                // Chained streams are not supported; keep what was decoded.
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(DecodeError::Read(e.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    let spec = *decoded.spec();
                    let count = spec.channels.count();

                    match channels {
                        Some(expected) if expected != count => {
                            return Err(DecodeError::Codec(format!(
                                "channel count changed mid-stream ({expected} → {count})"
                            )));
                        }
                        Some(_) => {}
                        None => channels = Some(count),
                    }
                    sample_rate.get_or_insert(spec.rate);

                    let mut packet_buf = PacketBuffer::<f32>::new(decoded.capacity() as u64, spec);
                    packet_buf.copy_interleaved_ref(decoded);
                    interleaved.extend_from_slice(packet_buf.samples());
                }
                Err(SymphoniaError::DecodeError(msg)) => {
                    skipped += 1;
                    log::warn!("decode: skipping corrupt packet: {msg}");
                }
                Err(e) => return Err(DecodeError::Codec(e.to_string())),
            }
        }

        let sample_rate = sample_rate.ok_or(DecodeError::MissingSampleRate)?;
        let channels = channels.unwrap_or(1);

        log::debug!(
            "decode: {media_type} → {} frames, {channels} ch @ {sample_rate} Hz ({skipped} packet(s) skipped)",
            interleaved.len() / channels.max(1)
        );

        Ok(SampleBuffer::from_interleaved(&interleaved, channels, sample_rate)?)
    }
}

// ---------------------------------------------------------------------------
// MockDecoder  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without parsing
/// anything.
#[cfg(test)]
pub struct MockDecoder {
    response: Result<SampleBuffer, DecodeError>,
    panic: bool,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockDecoder {
    /// Always returns `Ok(buffer)`.
    pub fn ok(buffer: SampleBuffer) -> Self {
        Self {
            response: Ok(buffer),
            panic: false,
            calls: Default::default(),
        }
    }

    /// Always returns `Err(error)`.
    pub fn err(error: DecodeError) -> Self {
        Self {
            response: Err(error),
            panic: false,
            calls: Default::default(),
        }
    }

    /// Panics on every call.
    pub fn panicking() -> Self {
        Self {
            response: Err(DecodeError::NoAudioTrack),
            panic: true,
            calls: Default::default(),
        }
    }

    /// Number of `decode` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Decoder for MockDecoder {
    fn decode(&self, _bytes: &[u8], _media_type: MediaType) -> Result<SampleBuffer, DecodeError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.panic {
            panic!("mock decoder panicked");
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal RIFF/WAVE file with 16-bit PCM samples (interleaved).
    fn wav_pcm16(samples: &[i16], channels: u16, rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let block_align = channels * 2;
        let byte_rate = rate * u32::from(block_align);

        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&channels.to_le_bytes());
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&byte_rate.to_le_bytes());
        out.extend_from_slice(&block_align.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn decodes_stereo_wav() {
        let frames = 2_205;
        let samples: Vec<i16> = (0..frames).flat_map(|_| [16_384i16, -16_384]).collect();
        let bytes = wav_pcm16(&samples, 2, 22_050);

        let buf = SymphoniaDecoder::new()
            .decode(&bytes, MediaType::Wav)
            .expect("decode wav");

        assert_eq!(buf.sample_rate(), 22_050);
        assert_eq!(buf.channel_count(), 2);
        assert_eq!(buf.frame_count(), frames);
        assert!(buf.channel(0).unwrap().iter().all(|&s| (s - 0.5).abs() < 1e-4));
        assert!(buf.channel(1).unwrap().iter().all(|&s| (s + 0.5).abs() < 1e-4));
    }

    #[test]
    fn decodes_mono_wav() {
        let bytes = wav_pcm16(&vec![0i16; 800], 1, 8_000);
        let buf = SymphoniaDecoder::new().decode(&bytes, MediaType::Wav).unwrap();
        assert_eq!(buf.channel_count(), 1);
        assert_eq!(buf.frame_count(), 800);
        assert!((buf.duration_secs() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn garbage_bytes_fail_to_probe() {
        let err = SymphoniaDecoder::new()
            .decode(b"definitely not an audio file", MediaType::Wav)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Probe(_)), "{err}");
    }

    #[test]
    fn mock_counts_calls() {
        let mock = MockDecoder::ok(SampleBuffer::silence(1, 8_000, 8).unwrap());
        assert_eq!(mock.calls(), 0);
        let _ = mock.decode(&[], MediaType::Wav);
        let _ = mock.decode(&[], MediaType::Ogg);
        assert_eq!(mock.calls(), 2);
    }
}
