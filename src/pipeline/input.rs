//! Input stage: read the Markdown source from disk.
//!
//! Errors are classified up front (missing, unreadable, not UTF-8) so the
//! caller gets an actionable message instead of a bare `io::Error`.

use crate::error::Md2PdfError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: char = '\u{FEFF}';

/// Read the whole file as UTF-8 text, dropping a leading byte-order mark.
pub fn read_source(path: &Path) -> Result<String, Md2PdfError> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Md2PdfError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => Md2PdfError::PermissionDenied {
            path: path.to_path_buf(),
        },
        ErrorKind::InvalidData => Md2PdfError::InvalidUtf8 {
            path: path.to_path_buf(),
        },
        _ => Md2PdfError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let text = match text.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    };

    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}
