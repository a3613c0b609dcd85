//! Export module — delivers the finished hex text as a `.txt` file.
//!
//! # Overview
//!
//! [`Exporter`] is the async output boundary.  The conversion job calls it
//! exactly once, and only after a conversion succeeded, so a partial or
//! corrupt result is never delivered.
//!
//! [`FileExporter`] writes into a directory; [`suggested_filename`] turns
//! the input file name into the output name (`song.mp3` → `song.txt`).
//!
//! # Usage
//!
//! ```no_run
//! use audio_to_hex::export::{suggested_filename, Exporter, FileExporter};
//!
//! # async fn example() {
//! let exporter = FileExporter::new("out");
//! let path = exporter
//!     .export("8080", &suggested_filename("song.mp3"))
//!     .await
//!     .expect("export failed");
//! println!("wrote {}", path.display());
//! # }
//! ```

pub mod file;
pub mod filename;

pub use file::FileExporter;
pub use filename::suggested_filename;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ExportError
// ---------------------------------------------------------------------------

/// All errors that can surface while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The suggested name has no file-name component.
    #[error("invalid output file name: {0:?}")]
    InvalidFilename(String),

    /// Creating the directory or writing the file failed.
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Exporter trait
// ---------------------------------------------------------------------------

/// Delivers converted text under a suggested file name.
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Persist `text` and return where it ended up.
    async fn export(&self, text: &str, suggested_filename: &str) -> Result<PathBuf, ExportError>;
}

// ---------------------------------------------------------------------------
// MockExporter  (test-only)
// ---------------------------------------------------------------------------

/// Records every export in memory instead of touching the filesystem.
#[cfg(test)]
#[derive(Default)]
pub struct MockExporter {
    exported: std::sync::Mutex<Vec<(String, String)>>,
    fail: bool,
}

#[cfg(test)]
impl MockExporter {
    /// An exporter whose every call fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            exported: Default::default(),
            fail: true,
        }
    }

    /// `(suggested_filename, text)` pairs exported so far.
    pub fn exported(&self) -> Vec<(String, String)> {
        self.exported.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Exporter for MockExporter {
    async fn export(&self, text: &str, suggested_filename: &str) -> Result<PathBuf, ExportError> {
        if self.fail {
            return Err(ExportError::Io {
                path: PathBuf::from(suggested_filename),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.exported
            .lock()
            .unwrap()
            .push((suggested_filename.to_string(), text.to_string()));
        Ok(PathBuf::from(suggested_filename))
    }
}
