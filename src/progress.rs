//! Progress-callback trait for conversion status events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the converter moves through its stages.
//!
//! The library itself never prints: every human-readable status line the
//! `md2pdf` binary shows ("✅ Successfully converted…", "🔄 Trying
//! alternative method…") is produced by a callback implementation. Tests
//! install a recording callback instead and assert on the event sequence.
//!
//! # Example
//!
//! ```rust
//! use edgequake_md2pdf::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct SizeLogger;
//!
//! impl ConversionProgressCallback for SizeLogger {
//!     fn on_pdf_written(&self, _input: &Path, output: &Path, bytes: u64) {
//!         eprintln!("{} is {} bytes", output.display(), bytes);
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(SizeLogger) as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::Md2PdfError;
use std::path::Path;
use std::sync::Arc;

/// Called by the converter as it moves through each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the source is read.
    fn on_conversion_start(&self, input: &Path, output: &Path) {
        let _ = (input, output);
    }

    /// The input path does not exist; the run is aborted.
    fn on_input_missing(&self, input: &Path) {
        let _ = input;
    }

    /// Called just before the external renderer is invoked.
    fn on_render_start(&self, html_len: usize) {
        let _ = html_len;
    }

    /// The PDF was written successfully.
    ///
    /// # Arguments
    /// * `bytes` — size of the file now on disk
    fn on_pdf_written(&self, input: &Path, output: &Path, bytes: u64) {
        let _ = (input, output, bytes);
    }

    /// The primary PDF conversion failed.
    fn on_pdf_failed(&self, error: &Md2PdfError) {
        let _ = error;
    }

    /// The HTML fallback is about to run.
    fn on_fallback_start(&self) {}

    /// The HTML fallback file was written.
    fn on_fallback_written(&self, path: &Path) {
        let _ = path;
    }

    /// The HTML fallback failed; there is no further recovery.
    fn on_fallback_failed(&self, error: &Md2PdfError) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need status events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
