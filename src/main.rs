//! Command-line entry point — audio file in, `.txt` of hex PCM out.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse arguments.
//! 3. Load [`AppConfig`] (default on first run); CLI flags override it.
//! 4. Create the [`tokio`] runtime.
//! 5. Read the input file and work out its declared media type.
//! 6. Run a [`ConversionJob`] with the symphonia decoder and a file exporter.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use audio_to_hex::{
    config::AppConfig,
    decode::{MediaType, SymphoniaDecoder},
    export::FileExporter,
    pipeline::{ConversionJob, LogProgress},
};
use clap::Parser;

/// MIME type reported for files whose extension maps to no audio type.
const UNKNOWN_MIME: &str = "application/octet-stream";

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "audio-to-hex")]
#[command(about = "Convert an audio file to 8-bit 8 kHz mono PCM as uppercase hex", long_about = None)]
struct Args {
    /// Audio file to convert (wav, mp3, ogg, flac, m4a).
    input: PathBuf,

    /// Declared media type; defaults to the one implied by the file extension.
    #[arg(long)]
    mime: Option<String>,

    /// Directory for the `.txt` output; defaults to the input's directory.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Disable TPDF dither for bit-exact output.
    #[arg(long)]
    no_dither: bool,

    /// Seed for the dither generator.
    #[arg(long)]
    seed: Option<u64>,

    /// Settings file to use instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn declared_mime(input: &Path) -> String {
    input
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(MediaType::from_extension)
        .map_or(UNKNOWN_MIME, MediaType::as_str)
        .to_string()
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => Ok(AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        })),
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Arguments
    let args = Args::parse();

    // 3. Configuration
    let mut config = load_config(args.config.as_deref())?;
    if args.no_dither {
        config.conversion.dither_enabled = false;
    }
    if let Some(dir) = args.output_dir.clone() {
        config.export.output_dir = Some(dir);
    }

    // 4. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 5. Input
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let mime = args.mime.clone().unwrap_or_else(|| declared_mime(&args.input));
    let original_name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output_dir = config
        .export
        .output_dir
        .clone()
        .or_else(|| args.input.parent().map(Path::to_path_buf))
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("."));

    log::info!(
        "audio-to-hex: {} ({mime}, {} bytes) → {}",
        args.input.display(),
        bytes.len(),
        output_dir.display()
    );

    // 6. Job
    let job = ConversionJob::new(
        Arc::new(SymphoniaDecoder::new()),
        Arc::new(FileExporter::new(output_dir)),
        Arc::new(LogProgress),
        config.conversion,
    )
    .with_seed(args.seed);

    let path = rt.block_on(job.run(bytes, &mime, &original_name))?;
    println!("{}", path.display());
    Ok(())
}
