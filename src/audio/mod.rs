//! Signal-processing stages — anti-alias filter → resampler → quantizer.
//!
//! # Pipeline
//!
//! ```text
//! SampleBuffer (native rate, N ch)
//!   → filter::apply      (cascaded low-pass biquads, native rate)
//!   → resample           (channel 0, 8 kHz)
//!   → quantize           (u8, optional TPDF dither)
//! ```
//!
//! Every stage borrows its input and returns a new value; nothing is
//! mutated in place.
//!
//! # Quick Start
//!
//! ```rust
//! use audio_to_hex::audio::{filter, quantize, resample, SampleBuffer};
//! use rand::rngs::StdRng;
//!
//! let buf = SampleBuffer::silence(2, 44_100, 4_410).unwrap();
//! let filtered = filter::apply(&buf, 3_800.0, 2, 0.707).unwrap();
//! let mono_8k = resample(&filtered, 8_000).unwrap();
//! let bytes = quantize(&mono_8k, None::<&mut StdRng>).unwrap();
//! assert_eq!(bytes.len(), 800);
//! assert!(bytes.as_bytes().iter().all(|&b| b == 0x80));
//! ```

pub mod buffer;
pub mod filter;
pub mod quantize;
pub mod resample;

pub use buffer::{BufferError, SampleBuffer};
pub use filter::Biquad;
pub use quantize::{quantize, quantize_sample, QuantizedSamples};
pub use resample::{output_frames, resample, resample_with, ResampleKernel};
