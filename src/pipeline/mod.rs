//! Pipeline module — turns decoded audio into hex text and drives whole
//! conversion jobs.
//!
//! # Architecture
//!
//! ```text
//! file bytes + declared MIME type
//!        │
//!        ▼
//! ConversionJob::run()  ← async
//!        │
//!        ├─ MediaType::parse               (UnsupportedFormat)
//!        ├─ spawn_blocking(Decoder::decode) (DecodeFailed)
//!        ├─ spawn_blocking(convert)
//!        │     filter → resample → quantize → hex
//!        └─ Exporter::export               → <name>.txt
//!
//! ProgressIndicator ←─── Started, then Finished or Failed
//! ```
//!
//! [`convert`] is the pure core and can be used on its own when audio is
//! already decoded.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use audio_to_hex::config::AppConfig;
//! use audio_to_hex::decode::SymphoniaDecoder;
//! use audio_to_hex::export::FileExporter;
//! use audio_to_hex::pipeline::{ConversionJob, LogProgress};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let job = ConversionJob::new(
//!         Arc::new(SymphoniaDecoder::new()),
//!         Arc::new(FileExporter::new(".")),
//!         Arc::new(LogProgress),
//!         config.conversion,
//!     );
//!
//!     let bytes = std::fs::read("voice.wav").unwrap();
//!     job.run(bytes, "audio/wav", "voice.wav").await.unwrap();
//! }
//! ```

pub mod convert;
pub mod error;
pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use convert::{convert, convert_async, convert_with_rng};
pub use error::ConversionError;
pub use runner::{ConversionJob, PipelineError};
pub use state::{LogProgress, ProgressGuard, ProgressIndicator, ProgressPhase};
