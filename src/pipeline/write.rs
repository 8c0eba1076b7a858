//! Atomic output: write to a temp file beside the target, then rename.
//!
//! A crash or full disk mid-write leaves the previous file (or nothing) at
//! the destination, never a truncated PDF.

use crate::error::Md2PdfError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `bytes` to `path` atomically, creating parent directories.
///
/// Returns the number of bytes now on disk.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<u64, Md2PdfError> {
    let fail = |source: std::io::Error| Md2PdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(fail)?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;

    let size = std::fs::metadata(path).map_err(fail)?.len();
    debug!("Wrote {} bytes to {}", size, path.display());
    Ok(size)
}
