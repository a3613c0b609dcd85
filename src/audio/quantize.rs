//! 8-bit unsigned quantization with optional TPDF dither.
//!
//! Per sample, in order:
//!
//! | Step | Operation |
//! |------|-----------|
//! | Sanitize | non-finite (`NaN`, `±∞`) → `0.0` |
//! | Clip | clamp to `[-1.0, 1.0]` |
//! | Scale | `(x + 1.0) * 0.5 * 255.0` |
//! | Dither | add `u1 - u2`, `u` uniform in `[0, 1)` (triangular PDF) |
//! | Round | nearest integer, halves away from zero |
//! | Clamp | `[0, 255]` |
//!
//! Silence maps to `0x80`.
//!
//! With dithering enabled the output is only statistically reproducible.
//! Pass a seeded generator (e.g. `StdRng::seed_from_u64`) to get identical
//! bytes across runs.
//!
//! # Example
//!
//! ```rust
//! use audio_to_hex::audio::{quantize, SampleBuffer};
//! use rand::rngs::StdRng;
//!
//! let buf = SampleBuffer::mono(vec![-1.0, 0.0, 1.0, f64::NAN], 8_000).unwrap();
//! let q = quantize(&buf, None::<&mut StdRng>).unwrap();
//! assert_eq!(q.as_bytes(), &[0x00, 0x80, 0xFF, 0x80]);
//! ```

use rand::Rng;

use crate::audio::SampleBuffer;
use crate::pipeline::ConversionError;

// ---------------------------------------------------------------------------
// QuantizedSamples
// ---------------------------------------------------------------------------

/// Mono 8-bit PCM, one byte per frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuantizedSamples(Vec<u8>);

impl QuantizedSamples {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for QuantizedSamples {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for QuantizedSamples {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// quantize
// ---------------------------------------------------------------------------

/// Quantize a mono buffer to 8-bit unsigned PCM.
///
/// `dither` is the random source for TPDF dither; `None` disables dithering
/// and makes the result bit-exact.
///
/// # Errors
///
/// [`ConversionError::RenderFailed`] when the buffer has more than one
/// channel (the resampler always produces mono).
pub fn quantize<R>(
    buffer: &SampleBuffer,
    mut dither: Option<&mut R>,
) -> Result<QuantizedSamples, ConversionError>
where
    R: Rng,
{
    if buffer.channel_count() != 1 {
        return Err(ConversionError::RenderFailed(format!(
            "quantizer expects mono input, got {} channels",
            buffer.channel_count()
        )));
    }

    let bytes = buffer.channels()[0]
        .iter()
        .map(|&s| {
            let noise = dither.as_deref_mut().map_or(0.0, |rng| tpdf(rng));
            quantize_sample(s, noise)
        })
        .collect();

    Ok(QuantizedSamples(bytes))
}

/// Quantize one sample, adding `noise` (in quantization steps) before
/// rounding.
///
/// ```rust
/// use audio_to_hex::audio::quantize_sample;
///
/// assert_eq!(quantize_sample(0.0, 0.0), 128);
/// assert_eq!(quantize_sample(f64::NEG_INFINITY, 0.0), 128);
/// assert_eq!(quantize_sample(2.0, 0.0), 255);
/// assert_eq!(quantize_sample(1.0, 0.9), 255);
/// ```
pub fn quantize_sample(sample: f64, noise: f64) -> u8 {
    let sanitized = if sample.is_finite() { sample } else { 0.0 };
    let clipped = sanitized.clamp(-1.0, 1.0);
    let scaled = (clipped + 1.0) * 0.5 * 255.0;
    (scaled + noise).round().clamp(0.0, 255.0) as u8
}

/// Triangular-PDF noise in `(-1, 1)` with zero mean.
fn tpdf<R: Rng>(rng: &mut R) -> f64 {
    rng.gen::<f64>() - rng.gen::<f64>()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
