//! Exporter that writes the hex text into a directory on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::export::{ExportError, Exporter};

/// Writes each export to `<dir>/<suggested_filename>`, creating `dir` on
/// demand.  An existing file with the same name is replaced.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl Exporter for FileExporter {
    async fn export(&self, text: &str, suggested_filename: &str) -> Result<PathBuf, ExportError> {
        let name = Path::new(suggested_filename)
            .file_name()
            .ok_or_else(|| ExportError::InvalidFilename(suggested_filename.to_string()))?;
        let path = self.dir.join(name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ExportError::Io {
                path: self.dir.clone(),
                source,
            })?;

        tokio::fs::write(&path, text.as_bytes())
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

        log::info!("export: wrote {} bytes to {}", text.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn writes_text_file() {
        let dir = tempdir().expect("temp dir");
        let exporter = FileExporter::new(dir.path());

        let path = exporter.export("8080FF", "clip.txt").await.expect("export");

        assert_eq!(path, dir.path().join("clip.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "8080FF");
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = tempdir().expect("temp dir");
        let nested = dir.path().join("a").join("b");
        let exporter = FileExporter::new(&nested);

        let path = exporter.export("00", "x.txt").await.expect("export");
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn suggested_name_cannot_escape_directory() {
        let dir = tempdir().expect("temp dir");
        let exporter = FileExporter::new(dir.path());

        let path = exporter.export("00", "../../evil.txt").await.expect("export");
        assert_eq!(path, dir.path().join("evil.txt"));
    }

    #[tokio::test]
    async fn rejects_nameless_target() {
        let dir = tempdir().expect("temp dir");
        let exporter = FileExporter::new(dir.path());

        let err = exporter.export("00", "..").await.unwrap_err();
        assert!(matches!(err, ExportError::InvalidFilename(_)), "{err}");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = tempdir().expect("temp dir");
        let exporter = FileExporter::new(dir.path());

        exporter.export("AAAA", "same.txt").await.unwrap();
        let path = exporter.export("BB", "same.txt").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "BB");
    }
}
