//! The conversion itself: decoded audio in, uppercase hex text out.
//!
//! ```text
//! SampleBuffer ─▶ filter::apply ─▶ resample_with ─▶ quantize ─▶ encode ─▶ String
//! ```
//!
//! Any failing stage short-circuits; no partial text is ever returned.

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::audio::{filter, quantize, resample_with, SampleBuffer};
use crate::config::ConversionConfig;
use crate::encode;

use super::ConversionError;

/// Convert `buffer` to an uppercase hex string of 8-bit, mono PCM at
/// `config.target_rate`.
///
/// Dither noise, when enabled, comes from the thread-local generator, so two
/// calls on the same input may differ in the least significant bit.  Use
/// [`convert_with_rng`] with a seeded generator for reproducible output, or
/// disable dithering.
///
/// # Errors
///
/// - [`ConversionError::EmptyInput`] when `buffer` has no frames.
/// - [`ConversionError::RenderFailed`] when a DSP stage rejects the
///   configuration.
///
/// # Example
///
/// ```rust
/// use audio_to_hex::audio::SampleBuffer;
/// use audio_to_hex::config::ConversionConfig;
/// use audio_to_hex::pipeline::convert;
///
/// let buf = SampleBuffer::silence(2, 16_000, 4).unwrap();
/// let hex = convert(&buf, &ConversionConfig::deterministic()).unwrap();
/// assert_eq!(hex, "8080");
/// ```
pub fn convert(buffer: &SampleBuffer, config: &ConversionConfig) -> Result<String, ConversionError> {
    if config.dither_enabled {
        convert_with_rng(buffer, config, Some(&mut rand::thread_rng()))
    } else {
        convert_with_rng(buffer, config, None::<&mut ThreadRng>)
    }
}

/// Like [`convert`], with the dither source supplied by the caller.
///
/// Dither is applied only when `config.dither_enabled` is set *and* a
/// generator is given.
pub fn convert_with_rng<R: Rng>(
    buffer: &SampleBuffer,
    config: &ConversionConfig,
    rng: Option<&mut R>,
) -> Result<String, ConversionError> {
    if buffer.is_empty() {
        return Err(ConversionError::EmptyInput);
    }

    let filtered = filter::apply(
        buffer,
        config.cutoff_hz,
        config.filter_sections,
        config.q,
    )?;
    let mono = resample_with(&filtered, config.target_rate, config.kernel)?;
    let dither = rng.filter(|_| config.dither_enabled);
    let pcm = quantize(&mono, dither)?;
    let hex = encode::encode(&pcm);

    log::debug!(
        "convert: {:.3} s @ {} Hz ({} ch) → {} bytes @ {} Hz",
        buffer.duration_secs(),
        buffer.sample_rate(),
        buffer.channel_count(),
        pcm.len(),
        config.target_rate
    );

    Ok(hex)
}

/// Run [`convert`] on tokio's blocking pool.
///
/// Resolves to exactly what [`convert`] would return.  A panic inside the
/// blocking task is reported as [`ConversionError::RenderFailed`].
pub async fn convert_async(
    buffer: SampleBuffer,
    config: ConversionConfig,
) -> Result<String, ConversionError> {
    tokio::task::spawn_blocking(move || convert(&buffer, &config))
        .await
        .map_err(|e| ConversionError::RenderFailed(format!("conversion task failed: {e}")))?
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
