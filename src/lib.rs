//! Convert audio files to 8-bit, 8 kHz, mono PCM rendered as uppercase hex.
//!
//! ```text
//! bytes ─▶ decode ─▶ audio::filter ─▶ audio::resample ─▶ audio::quantize ─▶ encode ─▶ export
//! ```

pub mod audio;
pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod pipeline;
