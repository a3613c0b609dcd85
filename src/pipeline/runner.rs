//! Conversion job — drives one file through decode → convert → export.
//!
//! # Job flow
//!
//! ```text
//! ProgressGuard::start                                   [Started]
//!   └─▶ MediaType::parse(declared_mime)   ── err ─▶ UnsupportedFormat
//!   └─▶ spawn_blocking(decoder.decode)    ── err ─▶ DecodeFailed
//!   └─▶ spawn_blocking(convert)           ── err ─▶ EmptyInput / RenderFailed
//!   └─▶ exporter.export(text, name.txt)   ── err ─▶ Export
//! guard.finish()                                         [Finished]
//!
//! any early exit (error, panic in a task) ─▶ guard dropped [Failed]
//! ```
//!
//! Decoding and DSP are CPU-bound and run on `tokio::task::spawn_blocking`
//! so the async runtime never stalls.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::config::ConversionConfig;
use crate::decode::{Decoder, MediaType};
use crate::export::{suggested_filename, ExportError, Exporter};

use super::convert::{convert, convert_with_rng};
use super::state::{ProgressGuard, ProgressIndicator};
use super::ConversionError;

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors that can surface from a [`ConversionJob`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The audio could not be converted.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// The hex text was produced but could not be delivered.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// Internal / unexpected error (e.g. a panicking blocking task).
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// ConversionJob
// ---------------------------------------------------------------------------

/// Converts encoded audio files and hands the result to an [`Exporter`].
///
/// Holds no per-file state; one job may convert any number of files, and
/// calls may run concurrently.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use audio_to_hex::config::ConversionConfig;
/// use audio_to_hex::decode::SymphoniaDecoder;
/// use audio_to_hex::export::FileExporter;
/// use audio_to_hex::pipeline::{ConversionJob, LogProgress};
///
/// # async fn example() {
/// let job = ConversionJob::new(
///     Arc::new(SymphoniaDecoder::new()),
///     Arc::new(FileExporter::new("out")),
///     Arc::new(LogProgress),
///     ConversionConfig::default(),
/// );
///
/// let bytes = std::fs::read("song.mp3").unwrap();
/// let path = job.run(bytes, "audio/mpeg", "song.mp3").await.unwrap();
/// println!("wrote {}", path.display());
/// # }
/// ```
pub struct ConversionJob {
    decoder: Arc<dyn Decoder>,
    exporter: Arc<dyn Exporter>,
    progress: Arc<dyn ProgressIndicator>,
    config: ConversionConfig,
    seed: Option<u64>,
}

impl ConversionJob {
    /// Create a new job.
    ///
    /// # Arguments
    ///
    /// * `decoder`  — turns file bytes into a [`SampleBuffer`](crate::audio::SampleBuffer).
    /// * `exporter` — receives the finished text (e.g. `FileExporter`).
    /// * `progress` — told when work starts and ends.
    /// * `config`   — DSP parameters applied to every file.
    pub fn new(
        decoder: Arc<dyn Decoder>,
        exporter: Arc<dyn Exporter>,
        progress: Arc<dyn ProgressIndicator>,
        config: ConversionConfig,
    ) -> Self {
        Self {
            decoder,
            exporter,
            progress,
            config,
            seed: None,
        }
    }

    /// Seed the dither generator so repeated runs produce identical text.
    /// `None` uses the thread-local generator.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------------

    /// Decode and convert `bytes`, returning the hex text without exporting.
    pub async fn convert_bytes(
        &self,
        bytes: Vec<u8>,
        declared_mime: &str,
    ) -> Result<String, PipelineError> {
        let guard = ProgressGuard::start(self.progress.as_ref());
        let text = self.render(bytes, declared_mime).await.map_err(log_failure)?;
        guard.finish();
        Ok(text)
    }

    /// Decode, convert and export `bytes`.  The exported file is named after
    /// `original_filename` with a `.txt` extension.
    ///
    /// Nothing is exported unless conversion succeeds.
    pub async fn run(
        &self,
        bytes: Vec<u8>,
        declared_mime: &str,
        original_filename: &str,
    ) -> Result<PathBuf, PipelineError> {
        let guard = ProgressGuard::start(self.progress.as_ref());

        let text = self.render(bytes, declared_mime).await.map_err(log_failure)?;
        let name = suggested_filename(original_filename);
        let path = self
            .exporter
            .export(&text, &name)
            .await
            .map_err(|e| log_failure(e.into()))?;

        guard.finish();
        log::info!(
            "pipeline: {original_filename} → {} ({} bytes of PCM)",
            path.display(),
            text.len() / 2
        );
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn render(&self, bytes: Vec<u8>, declared_mime: &str) -> Result<String, PipelineError> {
        // ── 1. Media type (before any decode attempt) ────────────────────
        let media_type = MediaType::parse(declared_mime).map_err(ConversionError::from)?;
        log::debug!("pipeline: decoding {} bytes as {media_type}", bytes.len());

        // ── 2. Decode (blocking → thread pool) ───────────────────────────
        let decoder = Arc::clone(&self.decoder);
        let buffer = tokio::task::spawn_blocking(move || decoder.decode(&bytes, media_type))
            .await
            .map_err(|e| PipelineError::Internal(format!("decode task failed: {e}")))?
            .map_err(ConversionError::from)?;

        log::debug!(
            "pipeline: decoded {} frames × {} ch @ {} Hz",
            buffer.frame_count(),
            buffer.channel_count(),
            buffer.sample_rate()
        );

        // ── 3. Convert (blocking → thread pool) ──────────────────────────
        let config = self.config.clone();
        let seed = self.seed;
        let text = tokio::task::spawn_blocking(move || match seed {
            Some(seed) => {
                convert_with_rng(&buffer, &config, Some(&mut StdRng::seed_from_u64(seed)))
            }
            None => convert(&buffer, &config),
        })
        .await
        .map_err(|e| PipelineError::Internal(format!("convert task failed: {e}")))??;

        Ok(text)
    }
}

fn log_failure(e: PipelineError) -> PipelineError {
    log::error!("pipeline error: {e}");
    e
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
