//! HTML → PDF rendering via an external engine.
//!
//! ## Why a trait?
//!
//! The real renderer is a native binary (`wkhtmltopdf`) that may not be
//! installed, and whose output is not byte-stable across versions. The
//! converter only depends on [`PdfRenderer`], so tests substitute a fake that
//! deterministically succeeds or fails, and callers can plug in another
//! engine without touching the pipeline.
//!
//! ## Why a temp file for the HTML?
//!
//! `wkhtmltopdf` resolves relative URLs and the `enable-local-file-access`
//! policy against a real file location; piping through stdin loses that. The
//! document is staged in a managed [`tempfile`] that is removed as soon as
//! rendering returns, and the PDF is read back from stdout.

use crate::config::{ConversionConfig, PdfOptions};
use crate::error::Md2PdfError;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Executable name searched on `PATH`.
pub const WKHTMLTOPDF: &str = "wkhtmltopdf";

/// Anything that can turn an HTML document into PDF bytes.
pub trait PdfRenderer {
    /// Render `html` with the given page options.
    fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, Md2PdfError>;
}

/// [`PdfRenderer`] backed by the `wkhtmltopdf` command-line tool.
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    binary: PathBuf,
}

impl WkHtmlToPdf {
    /// Use the binary at `binary` (a path, or a bare name resolved on `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Pick the binary: the explicit path if given, else the bare name, which
    /// the OS resolves on `PATH` at spawn time.
    ///
    /// Never fails. A binary that cannot be found surfaces as
    /// [`Md2PdfError::RendererNotFound`] at render time, where the converter
    /// can still fall back to HTML.
    pub fn locate(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self::new(path),
            None => Self::new(WKHTMLTOPDF),
        }
    }

    /// [`WkHtmlToPdf::locate`] using `config.renderer_path`.
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::locate(config.renderer_path.as_deref())
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// The full command line for rendering the document at `page` to stdout.
    pub fn command(&self, page: &Path, options: &PdfOptions) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(options.to_args())
            .arg("--quiet")
            .arg(page)
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl PdfRenderer for WkHtmlToPdf {
    fn render(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, Md2PdfError> {
        let mut page = tempfile::Builder::new()
            .prefix("md2pdf-")
            .suffix(".html")
            .tempfile()
            .map_err(Md2PdfError::TempFileFailed)?;
        page.write_all(html.as_bytes())
            .and_then(|_| page.flush())
            .map_err(Md2PdfError::TempFileFailed)?;

        let binary = self.binary.display().to_string();
        debug!(
            "Running {} {} --quiet {} -",
            binary,
            options.to_args().join(" "),
            page.path().display()
        );

        let output = self
            .command(page.path(), options)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Md2PdfError::RendererNotFound {
                    binary: binary.clone(),
                },
                _ => Md2PdfError::RendererSpawnFailed {
                    binary: binary.clone(),
                    source: e,
                },
            })?;

        if !output.status.success() {
            return Err(Md2PdfError::RendererFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(Md2PdfError::EmptyRenderOutput);
        }

        info!("{} produced {} bytes", binary, output.stdout.len());
        Ok(output.stdout)
    }
}
