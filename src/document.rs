//! Transcript loading.

use crate::error::{Result, SvarError};
use std::path::Path;
use tracing::debug;

/// A loaded transcript document.
///
/// Immutable once loaded; the chunker borrows its text.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source path the text was read from.
    pub source: String,
    /// Full text content.
    pub text: String,
}

impl Document {
    /// Read a transcript file fully into memory.
    ///
    /// Fails with [`SvarError::DocumentNotFound`] if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SvarError::DocumentNotFound(path.display().to_string()));
        }

        let text = std::fs::read_to_string(path)?;
        debug!("Loaded {} characters from {}", text.chars().count(), path.display());

        Ok(Self {
            source: path.display().to_string(),
            text,
        })
    }

    /// Length of the document in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "Hello from the podcast.\nSecond line.").unwrap();

        let doc = Document::load(&path).unwrap();
        assert!(doc.text.starts_with("Hello"));
        assert_eq!(doc.char_len(), doc.text.chars().count());
        assert_eq!(doc.source, path.display().to_string());
    }

    #[test]
    fn test_missing_document() {
        let err = Document::load(Path::new("/nonexistent/episode.txt")).unwrap_err();
        assert!(matches!(err, SvarError::DocumentNotFound(_)));
    }
}
