//! Sample-rate conversion and channel reduction.
//!
//! The output of every conversion is **mono at the target rate**.
//! [`resample`] / [`resample_with`] combine the two steps:
//!
//! 1. Channel reduction keeps channel 0.  The other channels are discarded,
//!    not averaged.
//! 2. Rate conversion produces exactly
//!    `ceil(frames * target_rate / source_rate)` frames.
//!
//! ## Kernels
//!
//! [`ResampleKernel::Linear`] interpolates between the two neighbouring source
//! samples.  It is the default: the anti-alias filter has already removed the
//! energy above the target Nyquist frequency.
//!
//! [`ResampleKernel::Fft`] runs the `rubato` FFT resampler, which is
//! band-limited on its own at the cost of some edge ringing.

use rubato::{FftFixedIn, Resampler as _};
use serde::{Deserialize, Serialize};

use crate::audio::SampleBuffer;
use crate::pipeline::ConversionError;

/// Input chunk length handed to the FFT resampler.
const FFT_CHUNK_FRAMES: usize = 1_024;

// ---------------------------------------------------------------------------
// ResampleKernel
// ---------------------------------------------------------------------------

/// Interpolation kernel used by [`resample_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleKernel {
    /// Linear interpolation between adjacent source samples.
    #[default]
    Linear,
    /// Band-limited FFT resampling (`rubato::FftFixedIn`).
    Fft,
}

// ---------------------------------------------------------------------------
// output_frames
// ---------------------------------------------------------------------------

/// Number of frames `frames` source frames at `source_rate` occupy at
/// `target_rate`, rounded up.
///
/// ```rust
/// use audio_to_hex::audio::output_frames;
///
/// assert_eq!(output_frames(44_100, 44_100, 8_000), 8_000);
/// assert_eq!(output_frames(1_000, 22_050, 8_000), 363); // 362.8… rounded up
/// ```
pub fn output_frames(frames: usize, source_rate: u32, target_rate: u32) -> usize {
    let num = frames as u128 * u128::from(target_rate);
    let den = u128::from(source_rate);
    num.div_ceil(den) as usize
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Reduce to mono and convert to `target_rate` with the linear kernel.
///
/// ```rust
/// use audio_to_hex::audio::{resample, SampleBuffer};
///
/// // 10 ms at 48 kHz → 10 ms at 8 kHz
/// let hi = SampleBuffer::mono(vec![0.5; 480], 48_000).unwrap();
/// let lo = resample(&hi, 8_000).unwrap();
/// assert_eq!(lo.frame_count(), 80);
/// assert_eq!(lo.sample_rate(), 8_000);
/// ```
pub fn resample(buffer: &SampleBuffer, target_rate: u32) -> Result<SampleBuffer, ConversionError> {
    resample_with(buffer, target_rate, ResampleKernel::Linear)
}

/// Reduce to mono and convert to `target_rate` with the chosen kernel.
///
/// # Errors
///
/// - [`ConversionError::EmptyInput`] when the buffer has no frames.
/// - [`ConversionError::RenderFailed`] when `target_rate == 0` or the FFT
///   resampler fails.
pub fn resample_with(
    buffer: &SampleBuffer,
    target_rate: u32,
    kernel: ResampleKernel,
) -> Result<SampleBuffer, ConversionError> {
    if buffer.is_empty() {
        return Err(ConversionError::EmptyInput);
    }
    if target_rate == 0 {
        return Err(ConversionError::RenderFailed(
            "target sample rate must be greater than 0 Hz".into(),
        ));
    }

    let source = &buffer.channels()[0];
    let source_rate = buffer.sample_rate();
    let out_len = output_frames(source.len(), source_rate, target_rate);

    let samples = if source_rate == target_rate {
        source.clone()
    } else {
        match kernel {
            ResampleKernel::Linear => linear(source, source_rate, target_rate, out_len),
            ResampleKernel::Fft => fft(source, source_rate, target_rate, out_len)?,
        }
    };

    log::debug!(
        "resample: {} frames @ {source_rate} Hz ({} ch) → {} frames @ {target_rate} Hz ({kernel:?})",
        buffer.frame_count(),
        buffer.channel_count(),
        samples.len()
    );

    Ok(SampleBuffer::mono(samples, target_rate)?)
}

/// Linear interpolation.  Output frame `j` sits at source position
/// `j * source_rate / target_rate`, computed exactly in integers.
fn linear(source: &[f64], source_rate: u32, target_rate: u32, out_len: usize) -> Vec<f64> {
    let last = source.len() - 1;
    let src = u128::from(source_rate);
    let dst = u128::from(target_rate);

    (0..out_len)
        .map(|j| {
            let pos = j as u128 * src;
            let idx = (pos / dst) as usize;
            let frac = (pos % dst) as f64 / dst as f64;

            if idx < last {
                source[idx] + (source[idx + 1] - source[idx]) * frac
            } else {
                // Past the end: hold the last sample.
                source[last]
            }
        })
        .collect()
}

/// Band-limited resampling through `rubato`, trimmed to `out_len` frames.
fn fft(
    source: &[f64],
    source_rate: u32,
    target_rate: u32,
    out_len: usize,
) -> Result<Vec<f64>, ConversionError> {
    let mut resampler = FftFixedIn::<f64>::new(
        source_rate as usize,
        target_rate as usize,
        FFT_CHUNK_FRAMES,
        2,
        1,
    )
    .map_err(|e| ConversionError::RenderFailed(format!("resampler setup: {e}")))?;

    let delay = resampler.output_delay();
    let wanted = delay + out_len;
    let mut output = Vec::with_capacity(wanted + FFT_CHUNK_FRAMES);
    let mut chunk = Vec::with_capacity(FFT_CHUNK_FRAMES);
    let mut pos = 0;

    // Once the source is exhausted, zero chunks flush the resampler's delay.
    while output.len() < wanted {
        let need = resampler.input_frames_next();
        chunk.clear();
        chunk.resize(need, 0.0);

        if pos < source.len() {
            let end = (pos + need).min(source.len());
            chunk[..end - pos].copy_from_slice(&source[pos..end]);
            pos = end;
        }

        let processed = resampler
            .process(&[chunk.as_slice()], None)
            .map_err(|e| ConversionError::RenderFailed(format!("resampler: {e}")))?;

        let produced = processed.first().map(Vec::as_slice).unwrap_or_default();
        if produced.is_empty() && pos >= source.len() {
            break;
        }
        output.extend_from_slice(produced);
    }

    let mut samples: Vec<f64> = output.into_iter().skip(delay).take(out_len).collect();
    if let Some(&last) = samples.last() {
        samples.resize(out_len, last);
    } else {
        samples.resize(out_len, 0.0);
    }
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(samples: Vec<f64>, rate: u32) -> SampleBuffer {
        SampleBuffer::mono(samples, rate).unwrap()
    }

    #[test]
    fn channel_zero_is_selected_not_averaged() {
        let buf = SampleBuffer::new(vec![vec![1.0, -1.0], vec![0.0, 0.0]], 8_000).unwrap();
        let out = resample(&buf, 8_000).unwrap();
        // Averaging would have produced [0.5, -0.5].
        assert_eq!(out.channel(0), Some(&[1.0, -1.0][..]));
        assert_eq!(out.channel_count(), 1);
    }

    #[test]
    fn same_rate_is_noop() {
        let input: Vec<f64> = (0..80).map(|i| i as f64 / 80.0).collect();
        let out = resample(&mono(input.clone(), 8_000), 8_000).unwrap();
        assert_eq!(out.channel(0).unwrap(), input.as_slice());
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = resample(&mono(Vec::new(), 48_000), 8_000).unwrap_err();
        assert_eq!(err, ConversionError::EmptyInput);
    }

    #[test]
    fn zero_target_rate_is_render_failure() {
        let err = resample(&mono(vec![0.0; 10], 48_000), 0).unwrap_err();
        assert!(matches!(err, ConversionError::RenderFailed(_)));
    }

    #[test]
    fn output_length_is_ceil_of_duration_times_rate() {
        for &(frames, rate) in &[
            (44_100usize, 44_100u32),
            (48_000, 48_000),
            (1_000, 22_050),
            (1, 96_000),
            (12_345, 11_025),
            (7, 8_000),
            (333, 16_000),
        ] {
            let out = resample(&mono(vec![0.0; frames], rate), 8_000).unwrap();
            let expected = (frames as f64 / f64::from(rate) * 8_000.0).ceil() as usize;
            assert!(
                out.frame_count().abs_diff(expected) <= 1,
                "{frames} @ {rate}: expected ~{expected}, got {}",
                out.frame_count()
            );
            assert_eq!(out.frame_count(), output_frames(frames, rate, 8_000));
        }
    }

    #[test]
    fn stereo_input_becomes_mono() {
        let buf = SampleBuffer::new(vec![vec![0.25; 480], vec![-0.75; 480]], 48_000).unwrap();
        let out = resample(&buf, 8_000).unwrap();
        assert_eq!(out.channel_count(), 1);
        assert!(out.channel(0).unwrap().iter().all(|&s| (s - 0.25).abs() < 1e-12));
    }

    #[test]
    fn constant_signal_preserves_amplitude() {
        let out = resample(&mono(vec![0.5; 441], 44_100), 8_000).unwrap();
        for &s in out.channel(0).unwrap() {
            assert!((s - 0.5).abs() < 1e-12, "amplitude drift: {s}");
        }
    }

    #[test]
    fn linear_interpolates_between_neighbours() {
        // 3 Hz source ramp → 2 Hz: positions 0, 1.5, 3 (clamped).
        let out = resample(&mono(vec![0.0, 1.0, 2.0, 3.0], 3), 2).unwrap();
        assert_eq!(out.channel(0).unwrap(), &[0.0, 1.5, 3.0]);
    }

    #[test]
    fn positions_past_the_end_hold_last_sample() {
        // Upsampling a single frame repeats it.
        let out = resample(&mono(vec![0.7], 4_000), 8_000).unwrap();
        assert_eq!(out.channel(0).unwrap(), &[0.7, 0.7]);
    }

    #[test]
    fn upsample_doubles_length() {
        let out = resample(&mono(vec![0.0; 40], 4_000), 8_000).unwrap();
        assert_eq!(out.frame_count(), 80);
    }

    // ---- fft kernel --------------------------------------------------------

    #[test]
    fn fft_kernel_matches_linear_length() {
        for &(frames, rate) in &[(44_100usize, 44_100u32), (1_000, 22_050), (4_800, 48_000)] {
            let buf = mono(vec![0.0; frames], rate);
            let out = resample_with(&buf, 8_000, ResampleKernel::Fft).unwrap();
            assert_eq!(out.frame_count(), output_frames(frames, rate, 8_000));
        }
    }

    #[test]
    fn fft_kernel_keeps_dc_level_in_the_middle() {
        let buf = mono(vec![0.5; 48_000], 48_000);
        let out = resample_with(&buf, 8_000, ResampleKernel::Fft).unwrap();
        let samples = out.channel(0).unwrap();
        let mid = &samples[1_000..7_000];
        for &s in mid {
            assert!((s - 0.5).abs() < 0.01, "dc drift: {s}");
        }
    }

    #[test]
    fn kernel_serializes_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrap {
            kernel: ResampleKernel,
        }
        let text = toml::to_string(&Wrap {
            kernel: ResampleKernel::Fft,
        })
        .unwrap();
        assert_eq!(text.trim(), r#"kernel = "fft""#);
        let back: Wrap = toml::from_str(r#"kernel = "linear""#).unwrap();
        assert_eq!(back.kernel, ResampleKernel::Linear);
    }
}
