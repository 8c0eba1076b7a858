//! Error types for the edgequake-md2pdf library.
//!
//! A single enum, [`Md2PdfError`], covers every failure the pipeline can
//! hit. The variants fall into two groups that the converter treats
//! differently:
//!
//! * **Input errors** (`FileNotFound`, `PermissionDenied`, `InvalidUtf8`,
//!   `ReadFailed`) abort the whole run: there is nothing to render.
//!
//! * **Render errors** (`RendererNotFound`, `RendererFailed`, …) are
//!   recoverable at the top level: [`crate::convert::run`] catches them and
//!   writes the HTML fallback instead. Only when that fallback also fails is
//!   [`Md2PdfError::FallbackFailed`] returned to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-md2pdf library.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but is not valid UTF-8 text.
    #[error("File is not valid UTF-8: '{path}'\nRe-save it with UTF-8 encoding.")]
    InvalidUtf8 { path: PathBuf },

    /// Any other I/O failure while reading the source.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Renderer errors ───────────────────────────────────────────────────
    /// No `wkhtmltopdf` executable could be located.
    #[error(
        "PDF renderer '{binary}' was not found.\n\n\
This method requires wkhtmltopdf to be installed:\n\
  • Debian/Ubuntu: apt install wkhtmltopdf\n\
  • macOS:         brew install --cask wkhtmltopdf\n\
  • Or point WKHTMLTOPDF_PATH at an existing binary.\n"
    )]
    RendererNotFound { binary: String },

    /// The renderer binary exists but could not be started.
    #[error("Failed to launch PDF renderer '{binary}': {source}")]
    RendererSpawnFailed {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran but exited unsuccessfully.
    #[error("PDF renderer exited with {status}: {stderr}")]
    RendererFailed { status: String, stderr: String },

    /// The renderer reported success but produced no bytes.
    #[error("PDF renderer produced no output")]
    EmptyRenderOutput,

    /// Could not stage the HTML document for the renderer.
    #[error("Failed to create temporary file: {0}")]
    TempFileFailed(#[source] std::io::Error),

    // ── Transformation errors ─────────────────────────────────────────────
    /// syntect failed while highlighting a code block.
    #[error("Syntax highlighting failed: {0}")]
    HighlightFailed(String),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PDF rendering failed and so did the HTML fallback.
    #[error("PDF conversion failed ({pdf_error}) and the HTML fallback failed too: {source}")]
    FallbackFailed {
        pdf_error: String,
        #[source]
        source: Box<Md2PdfError>,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Md2PdfError {
    /// True for errors raised by the external renderer stage.
    ///
    /// The CLI uses this to decide whether to print the install hint.
    pub fn is_renderer_error(&self) -> bool {
        matches!(
            self,
            Md2PdfError::RendererNotFound { .. }
                | Md2PdfError::RendererSpawnFailed { .. }
                | Md2PdfError::RendererFailed { .. }
                | Md2PdfError::EmptyRenderOutput
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display() {
        let e = Md2PdfError::FileNotFound {
            path: PathBuf::from("README.md"),
        };
        assert!(e.to_string().contains("README.md"));
    }

    #[test]
    fn renderer_not_found_mentions_install() {
        let e = Md2PdfError::RendererNotFound {
            binary: "wkhtmltopdf".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("wkhtmltopdf"), "got: {msg}");
        assert!(msg.contains("installed"), "got: {msg}");
    }

    #[test]
    fn renderer_failed_display() {
        let e = Md2PdfError::RendererFailed {
            status: "exit status: 1".into(),
            stderr: "Exit with code 1 due to network error".into(),
        };
        assert!(e.to_string().contains("exit status: 1"));
        assert!(e.to_string().contains("network error"));
    }

    #[test]
    fn fallback_failed_carries_both_errors() {
        let e = Md2PdfError::FallbackFailed {
            pdf_error: "renderer missing".into(),
            source: Box::new(Md2PdfError::InvalidConfig("boom".into())),
        };
        let msg = e.to_string();
        assert!(msg.contains("renderer missing"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn renderer_error_classification() {
        assert!(Md2PdfError::EmptyRenderOutput.is_renderer_error());
        assert!(!Md2PdfError::InvalidConfig("x".into()).is_renderer_error());
    }
}
