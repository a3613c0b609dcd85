//! Conversion settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to worker
//! threads.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::audio::ResampleKernel;

/// Output sample rate in Hz.  Fixed; not configurable from the settings file.
pub const TARGET_RATE: u32 = 8_000;

/// Distance between the anti-alias cutoff and the target Nyquist frequency.
const CUTOFF_MARGIN_HZ: f64 = 200.0;

fn default_target_rate() -> u32 {
    TARGET_RATE
}

// ---------------------------------------------------------------------------
// ConversionConfig
// ---------------------------------------------------------------------------

/// Parameters of a single conversion.
///
/// Passed explicitly to [`convert`](fn@crate::pipeline::convert); there is no
/// process-wide mutable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Output rate in Hz (always 8 000 when loaded from disk).
    #[serde(skip, default = "default_target_rate")]
    pub target_rate: u32,
    /// Anti-alias low-pass cutoff in Hz, 200 Hz below the target Nyquist.
    pub cutoff_hz: f64,
    /// Number of cascaded biquad sections.
    pub filter_sections: usize,
    /// Quality factor of each section (0.707 = Butterworth).
    pub q: f64,
    /// Add TPDF dither before rounding.
    pub dither_enabled: bool,
    /// Resampling kernel.
    pub kernel: ResampleKernel,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            target_rate: TARGET_RATE,
            cutoff_hz: f64::from(TARGET_RATE) / 2.0 - CUTOFF_MARGIN_HZ,
            filter_sections: 2,
            q: 0.707,
            dither_enabled: true,
            kernel: ResampleKernel::default(),
        }
    }
}

impl ConversionConfig {
    /// Default settings with dithering disabled — bit-exact output.
    pub fn deterministic() -> Self {
        Self {
            dither_enabled: false,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// ExportConfig
// ---------------------------------------------------------------------------

/// Where converted files are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory.  `None` means next to the input file.
    pub output_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use audio_to_hex::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// DSP parameters.
    pub conversion: ConversionConfig,
    /// Output location.
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
