//! Artifact writer
//!
//! Persists generated tests. Each write replaces the previous file; parent
//! directories must already exist.

use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::sanitize::FenceSanitizer;

/// Writes sanitized test code to disk
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    /// Destination used by [`ArtifactWriter::persist_default`]
    default_path: PathBuf,
    /// Applied to every write
    sanitizer: FenceSanitizer,
}

impl ArtifactWriter {
    /// Create writer with a default destination
    #[inline]
    #[must_use]
    pub fn new(default_path: impl Into<PathBuf>) -> Self {
        Self {
            default_path: default_path.into(),
            sanitizer: FenceSanitizer::default(),
        }
    }

    /// With a custom sanitizer
    #[inline]
    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: FenceSanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Get default destination
    #[inline]
    #[must_use]
    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Sanitize `text` and overwrite `path` with it
    ///
    /// Empty text produces an empty file.
    ///
    /// # Errors
    /// Returns `PersistenceError::Io` if the write fails
    pub async fn persist(
        &self,
        text: &str,
        path: impl AsRef<Path>,
    ) -> Result<PathBuf, PersistenceError> {
        let path = path.as_ref();
        let cleaned = self.sanitizer.sanitize(text);

        tokio::fs::write(path, cleaned.as_bytes())
            .await
            .map_err(|e| PersistenceError::io_error(path, e))?;

        tracing::info!("Test case saved to {}", path.display());
        Ok(path.to_path_buf())
    }

    /// Persist to the default destination
    ///
    /// # Errors
    /// Returns `PersistenceError::Io` if the write fails
    pub async fn persist_default(&self, text: &str) -> Result<PathBuf, PersistenceError> {
        self.persist(text, &self.default_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_sanitized_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_divide.py");
        let writer = ArtifactWriter::new(&path);

        let written = writer
            .persist("```python\ndef test_x():\n    assert True\n```", &path)
            .await
            .unwrap();

        assert_eq!(written, path);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "def test_x():\n    assert True"
        );
    }

    #[tokio::test]
    async fn overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.py");
        std::fs::write(&path, "old content that is much longer than the new one").unwrap();

        let writer = ArtifactWriter::new(&path);
        writer.persist_default("new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[tokio::test]
    async fn empty_text_truncates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.py");
        std::fs::write(&path, "previous").unwrap();

        ArtifactWriter::new(&path).persist("", &path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[tokio::test]
    async fn custom_sanitizer_strips_its_own_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.rs");
        let writer = ArtifactWriter::new(&path).with_sanitizer(FenceSanitizer::new("rust"));

        writer
            .persist_default("```rust\n#[test]\nfn ok() {}\n```")
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#[test]\nfn ok() {}");
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.py");

        let err = ArtifactWriter::new(&path)
            .persist_default("x")
            .await
            .unwrap_err();

        assert_eq!(err.path(), path.as_path());
    }
}
