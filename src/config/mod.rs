//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), `ConversionConfig` (DSP
//! parameters passed to the pipeline), `AppPaths` for the platform config
//! directory, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, ConversionConfig, ExportConfig, TARGET_RATE};
