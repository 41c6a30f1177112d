use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Document;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a markup file into a document
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(Document::from_bytes(&bytes))
}

/// Write a document as markup, creating parent directories as needed
pub fn write_document(path: &Path, doc: &Document) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = doc.to_markup();
    content.push('\n');
    fs::write(path, content)?;
    log::debug!("wrote {} blocks to {}", doc.top_level_blocks().len(), path.display());
    Ok(())
}

impl Document {
    /// Read markup from raw bytes. Invalid UTF-8 is replaced rather than
    /// rejected, like every other malformed input.
    pub fn from_bytes(bytes: &[u8]) -> Document {
        Document::from_markup(&String::from_utf8_lossy(bytes))
    }
}
