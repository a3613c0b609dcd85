//! Anti-aliasing low-pass filter.
//!
//! A cascade of identical second-order IIR low-pass sections ("biquads",
//! RBJ cookbook form) run at the input's native sample rate, before any rate
//! change.  Two Butterworth sections (`q = 0.707`) give a ~24 dB/octave
//! roll-off above the cutoff.
//!
//! ```text
//! x ─▶ [Biquad] ─▶ [Biquad] ─▶ … ─▶ y      (one chain per channel)
//! ```
//!
//! # Example
//!
//! ```rust
//! use audio_to_hex::audio::{filter, SampleBuffer};
//!
//! let buf = SampleBuffer::mono(vec![0.5; 441], 44_100).unwrap();
//! let out = filter::apply(&buf, 3_800.0, 2, 0.707).unwrap();
//! assert_eq!(out.frame_count(), buf.frame_count());
//! assert_eq!(out.sample_rate(), 44_100);
//! ```

use std::f64::consts::PI;

use crate::audio::SampleBuffer;
use crate::pipeline::ConversionError;

// ---------------------------------------------------------------------------
// Biquad
// ---------------------------------------------------------------------------

/// One second-order low-pass section with its own history.
///
/// Coefficients are stored normalized (`a0 == 1`).
#[derive(Debug, Clone)]
pub struct Biquad {
    cutoff_hz: f64,
    q: f64,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    /// x[n-1], x[n-2]
    x: [f64; 2],
    /// y[n-1], y[n-2]
    y: [f64; 2],
}

impl Biquad {
    /// Low-pass section for `cutoff_hz` at `sample_rate`.
    ///
    /// The caller guarantees `0 < cutoff_hz < sample_rate / 2` and `q > 0`;
    /// [`apply`] checks this before building any section.
    pub fn low_pass(cutoff_hz: f64, q: f64, sample_rate: u32) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / f64::from(sample_rate);
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        let a0 = 1.0 + alpha;
        let b1 = (1.0 - cos_w0) / a0;

        Self {
            cutoff_hz,
            q,
            b0: b1 / 2.0,
            b1,
            b2: b1 / 2.0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            x: [0.0; 2],
            y: [0.0; 2],
        }
    }

    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    /// `(b0, b1, b2, a1, a2)`
    pub fn coefficients(&self) -> (f64, f64, f64, f64, f64) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Feed one input sample and return the filtered output (direct form I).
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        // A single non-finite sample would otherwise stay in the history
        // forever.
        let x0 = if input.is_finite() { input } else { 0.0 };

        let y0 = self.b0 * x0 + self.b1 * self.x[0] + self.b2 * self.x[1]
            - self.a1 * self.y[0]
            - self.a2 * self.y[1];

        self.x = [x0, self.x[0]];
        self.y = [y0, self.y[0]];
        y0
    }
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

/// Run every channel of `buffer` through `sections` cascaded low-pass
/// biquads at `cutoff_hz` / `q`.
///
/// Returns a new buffer with the same rate, channel count and frame count.
///
/// * `sections == 0` returns the input unchanged.
/// * If `cutoff_hz` is at or above the input's Nyquist frequency there is no
///   energy to remove and the input is returned unchanged.
///
/// # Errors
///
/// - [`ConversionError::EmptyInput`] when the buffer has no frames.
/// - [`ConversionError::RenderFailed`] when `cutoff_hz` or `q` is not a
///   positive finite number.
pub fn apply(
    buffer: &SampleBuffer,
    cutoff_hz: f64,
    sections: usize,
    q: f64,
) -> Result<SampleBuffer, ConversionError> {
    if buffer.is_empty() {
        return Err(ConversionError::EmptyInput);
    }
    if !(cutoff_hz.is_finite() && cutoff_hz > 0.0) {
        return Err(ConversionError::RenderFailed(format!(
            "invalid filter cutoff: {cutoff_hz} Hz"
        )));
    }
    if !(q.is_finite() && q > 0.0) {
        return Err(ConversionError::RenderFailed(format!(
            "invalid filter Q: {q}"
        )));
    }

    let nyquist = f64::from(buffer.sample_rate()) / 2.0;
    if sections == 0 || cutoff_hz >= nyquist {
        log::debug!(
            "filter: pass-through (sections={sections}, cutoff={cutoff_hz} Hz, nyquist={nyquist} Hz)"
        );
        return Ok(buffer.clone());
    }

    let channels = buffer
        .channels()
        .iter()
        .map(|samples| filter_channel(samples, cutoff_hz, sections, q, buffer.sample_rate()))
        .collect();

    log::debug!(
        "filter: {} ch × {} frames @ {} Hz, {sections} section(s) at {cutoff_hz} Hz",
        buffer.channel_count(),
        buffer.frame_count(),
        buffer.sample_rate()
    );

    Ok(SampleBuffer::new(channels, buffer.sample_rate())?)
}

/// Filter one channel with a fresh cascade.
fn filter_channel(
    samples: &[f64],
    cutoff_hz: f64,
    sections: usize,
    q: f64,
    sample_rate: u32,
) -> Vec<f64> {
    let mut cascade = vec![Biquad::low_pass(cutoff_hz, q, sample_rate); sections];

    samples
        .iter()
        .map(|&s| cascade.iter_mut().fold(s, |acc, section| section.process(acc)))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amplitude: f64, rate: u32, frames: usize) -> Vec<f64> {
        (0..frames)
            .map(|n| amplitude * (2.0 * PI * freq * n as f64 / f64::from(rate)).sin())
            .collect()
    }

    fn peak(samples: &[f64]) -> f64 {
        samples.iter().fold(0.0_f64, |m, s| m.max(s.abs()))
    }

    #[test]
    fn coefficients_have_unity_dc_gain() {
        let bq = Biquad::low_pass(3_800.0, 0.707, 44_100);
        let (b0, b1, b2, a1, a2) = bq.coefficients();
        let dc = (b0 + b1 + b2) / (1.0 + a1 + a2);
        assert!((dc - 1.0).abs() < 1e-12, "dc gain {dc}");
        assert_eq!(bq.cutoff_hz(), 3_800.0);
        assert_eq!(bq.q(), 0.707);
    }

    #[test]
    fn dc_signal_settles_to_input_level() {
        let buf = SampleBuffer::mono(vec![0.5; 4_410], 44_100).unwrap();
        let out = apply(&buf, 3_800.0, 2, 0.707).unwrap();
        let tail = &out.channel(0).unwrap()[4_000..];
        for &s in tail {
            assert!((s - 0.5).abs() < 1e-6, "dc drift: {s}");
        }
    }

    #[test]
    fn passband_tone_is_preserved() {
        let rate = 44_100;
        let buf = SampleBuffer::mono(sine(500.0, 0.8, rate, 44_100), rate).unwrap();
        let out = apply(&buf, 3_800.0, 2, 0.707).unwrap();
        let steady = &out.channel(0).unwrap()[4_410..];
        let p = peak(steady);
        assert!(p > 0.79 && p <= 0.8 + 1e-3, "passband peak {p}");
    }

    #[test]
    fn stopband_tone_is_attenuated_more_by_two_sections() {
        let rate = 44_100;
        let buf = SampleBuffer::mono(sine(10_000.0, 0.8, rate, 44_100), rate).unwrap();

        let one = apply(&buf, 3_800.0, 1, 0.707).unwrap();
        let two = apply(&buf, 3_800.0, 2, 0.707).unwrap();

        let p1 = peak(&one.channel(0).unwrap()[4_410..]);
        let p2 = peak(&two.channel(0).unwrap()[4_410..]);

        // ~-17 dB per section at 10 kHz.
        assert!(p1 < 0.8 * 0.2, "one section peak {p1}");
        assert!(p2 < 0.8 * 0.04, "two section peak {p2}");
        assert!(p2 < p1);
    }

    #[test]
    fn channels_are_filtered_independently() {
        let rate = 44_100;
        let loud = sine(1_000.0, 0.9, rate, 2_000);
        let silent = vec![0.0; 2_000];
        let buf = SampleBuffer::new(vec![loud, silent], rate).unwrap();

        let out = apply(&buf, 3_800.0, 2, 0.707).unwrap();
        assert_eq!(out.channel_count(), 2);
        assert!(out.channel(1).unwrap().iter().all(|&s| s == 0.0));
        assert!(peak(out.channel(0).unwrap()) > 0.5);
    }

    #[test]
    fn input_is_not_mutated() {
        let buf = SampleBuffer::mono(sine(6_000.0, 0.5, 44_100, 512), 44_100).unwrap();
        let before = buf.clone();
        let _ = apply(&buf, 3_800.0, 2, 0.707).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn non_finite_sample_does_not_poison_state() {
        let mut samples = vec![0.25; 2_000];
        samples[10] = f64::NAN;
        samples[20] = f64::INFINITY;
        let buf = SampleBuffer::mono(samples, 44_100).unwrap();
        let out = apply(&buf, 3_800.0, 2, 0.707).unwrap();
        assert!(out.channel(0).unwrap().iter().all(|s| s.is_finite()));
        let last = *out.channel(0).unwrap().last().unwrap();
        assert!((last - 0.25).abs() < 1e-6);
    }

    #[test]
    fn cutoff_above_nyquist_passes_through() {
        let buf = SampleBuffer::mono(sine(1_000.0, 0.5, 7_000, 700), 7_000).unwrap();
        let out = apply(&buf, 3_800.0, 2, 0.707).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn zero_sections_passes_through() {
        let buf = SampleBuffer::mono(vec![0.1, 0.2, 0.3], 44_100).unwrap();
        assert_eq!(apply(&buf, 3_800.0, 0, 0.707).unwrap(), buf);
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let buf = SampleBuffer::mono(Vec::new(), 44_100).unwrap();
        assert_eq!(
            apply(&buf, 3_800.0, 2, 0.707).unwrap_err(),
            ConversionError::EmptyInput
        );
    }

    #[test]
    fn invalid_parameters_are_render_failures() {
        let buf = SampleBuffer::mono(vec![0.0; 8], 44_100).unwrap();
        assert!(matches!(
            apply(&buf, 0.0, 2, 0.707),
            Err(ConversionError::RenderFailed(_))
        ));
        assert!(matches!(
            apply(&buf, 3_800.0, 2, f64::NAN),
            Err(ConversionError::RenderFailed(_))
        ));
    }
}
