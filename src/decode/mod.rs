//! Decoder boundary — encoded file bytes → [`SampleBuffer`](crate::audio::SampleBuffer).
//!
//! # Architecture
//!
//! ```text
//! declared type ──▶ MediaType::parse ──✗──▶ UnsupportedFormat (no decode)
//!                        │
//!                        ▼
//! raw bytes ──────▶ Decoder::decode ──▶ SampleBuffer (native rate, N ch)
//!                   (SymphoniaDecoder)
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use audio_to_hex::decode::{Decoder, MediaType, SymphoniaDecoder};
//!
//! let bytes = std::fs::read("song.flac").unwrap();
//! let media_type = MediaType::parse("audio/flac").unwrap();
//! let buffer = SymphoniaDecoder::new().decode(&bytes, media_type).unwrap();
//! println!("{} frames @ {} Hz", buffer.frame_count(), buffer.sample_rate());
//! ```

pub mod engine;
pub mod media_type;

pub use engine::{DecodeError, Decoder, SymphoniaDecoder};
pub use media_type::{MediaType, UnsupportedMediaType};

#[cfg(test)]
pub use engine::MockDecoder;
