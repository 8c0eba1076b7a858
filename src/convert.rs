//! Conversion entry points.
//!
//! ```text
//! run ─▶ input exists? ─no─▶ Err(FileNotFound)
//!          │yes
//!          ▼
//!        convert (PDF) ─ok─▶ Ok(Pdf)
//!          │failed
//!          ▼
//!        convert_to_html_fallback ─ok─▶ Ok(HtmlFallback)
//!          │failed
//!          ▼
//!        Err(FallbackFailed)
//! ```
//!
//! [`convert`] and [`convert_to_html_fallback`] report through the progress
//! callback and never return an error, matching the tool's console contract.
//! [`try_convert`] and [`write_html_fallback`] are the same operations with
//! structured errors, and [`run`] chains them.

use crate::config::ConversionConfig;
use crate::error::Md2PdfError;
use crate::output::ConversionOutcome;
use crate::pipeline::render::PdfRenderer;
use crate::pipeline::{highlight, input, markdown, template, write};
use crate::progress::{ConversionProgressCallback, NoopProgressCallback};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Convert `input_path` and run the full PDF-then-fallback chain.
///
/// # Returns
/// `Ok(ConversionOutcome::Pdf)` when the PDF was written, or
/// `Ok(ConversionOutcome::HtmlFallback)` when rendering failed but the
/// fallback HTML was written.
///
/// # Errors
/// - [`Md2PdfError::FileNotFound`] if the input does not exist (nothing is written)
/// - the PDF error itself when rendering failed and `config.fallback` is off
/// - [`Md2PdfError::FallbackFailed`] when both paths failed
pub fn run(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
    renderer: &dyn PdfRenderer,
) -> Result<ConversionOutcome, Md2PdfError> {
    let input_path = input_path.as_ref();
    let output_path = output_path.as_ref();
    let events = events(config);
    let start = Instant::now();

    info!(
        "Starting conversion: {} → {}",
        input_path.display(),
        output_path.display()
    );
    events.on_conversion_start(input_path, output_path);

    if !input_path.exists() {
        events.on_input_missing(input_path);
        return Err(Md2PdfError::FileNotFound {
            path: input_path.to_path_buf(),
        });
    }

    let pdf_error = match attempt_pdf(input_path, output_path, config, renderer) {
        Ok(bytes) => {
            info!(
                "Conversion complete: {} bytes in {}ms",
                bytes,
                start.elapsed().as_millis()
            );
            return Ok(ConversionOutcome::Pdf {
                path: output_path.to_path_buf(),
                bytes,
            });
        }
        Err(e) if !config.fallback => return Err(e),
        Err(e) => e,
    };

    events.on_fallback_start();
    match attempt_fallback(input_path, output_path, config) {
        Ok(path) => Ok(ConversionOutcome::HtmlFallback {
            path,
            pdf_error: pdf_error.to_string(),
        }),
        Err(e) => Err(Md2PdfError::FallbackFailed {
            pdf_error: pdf_error.to_string(),
            source: Box::new(e),
        }),
    }
}

/// Convert Markdown to PDF, reporting the outcome instead of returning it.
///
/// Returns `true` when the PDF was written. Any failure (missing renderer,
/// renderer error, I/O) is reported via [`ConversionProgressCallback::on_pdf_failed`]
/// and yields `false`.
pub fn convert(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
    renderer: &dyn PdfRenderer,
) -> bool {
    attempt_pdf(input_path.as_ref(), output_path.as_ref(), config, renderer).is_ok()
}

/// Convert Markdown to PDF.
///
/// Returns the size in bytes of the written PDF.
pub fn try_convert(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
    renderer: &dyn PdfRenderer,
) -> Result<u64, Md2PdfError> {
    let input_path = input_path.as_ref();
    let source = input::read_source(input_path)?;
    let html = render_document(&source, &config.title_for(input_path), config)?;

    events(config).on_render_start(html.len());
    let pdf = renderer.render(&html, &config.pdf)?;
    write::write_atomic(output_path.as_ref(), &pdf)
}

/// Write the simpler HTML version, reporting the outcome instead of returning it.
///
/// `output_path` is the PDF path the fallback stands in for; the HTML lands
/// at [`ConversionConfig::fallback_path_for`] of it.
pub fn convert_to_html_fallback(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) {
    let _ = attempt_fallback(input_path.as_ref(), output_path.as_ref(), config);
}

/// Write the simpler HTML version of `input_path`.
///
/// Returns the path of the written HTML file.
pub fn write_html_fallback(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<PathBuf, Md2PdfError> {
    let input_path = input_path.as_ref();
    let path = config.fallback_path_for(output_path.as_ref());
    if same_file(&path, input_path) {
        return Err(Md2PdfError::InvalidConfig(format!(
            "fallback path '{}' would overwrite the input",
            path.display()
        )));
    }

    let source = input::read_source(input_path)?;
    let html = render_fallback_document(&source, &config.title_for(input_path), config)?;
    write::write_atomic(&path, html.as_bytes())?;
    Ok(path)
}

/// Build the complete styled document handed to the PDF renderer.
pub fn render_document(
    source: &str,
    title: &str,
    config: &ConversionConfig,
) -> Result<String, Md2PdfError> {
    let body = markdown::to_html(source, &config.extensions)?;
    let css = if config.extensions.codehilite {
        Some(highlight::stylesheet(&config.highlight_theme)?)
    } else {
        None
    };
    Ok(template::styled_document(title, &body, css.as_deref()))
}

/// Build the fallback document written when PDF rendering fails.
pub fn render_fallback_document(
    source: &str,
    title: &str,
    config: &ConversionConfig,
) -> Result<String, Md2PdfError> {
    let body = markdown::to_html(source, &config.fallback_extensions)?;
    Ok(template::fallback_document(title, &body))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// True if `a` and `b` name the same file, after resolving `.`/`..` and
/// symlinks. A path that does not exist yet is resolved through its parent.
fn same_file(a: &Path, b: &Path) -> bool {
    fn resolve(p: &Path) -> Option<PathBuf> {
        if let Ok(full) = std::fs::canonicalize(p) {
            return Some(full);
        }
        let name = p.file_name()?;
        let parent = match p.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        Some(std::fs::canonicalize(parent).ok()?.join(name))
    }

    a == b || matches!((resolve(a), resolve(b)), (Some(x), Some(y)) if x == y)
}

fn events(config: &ConversionConfig) -> &dyn ConversionProgressCallback {
    match config.progress_callback {
        Some(ref cb) => cb.as_ref(),
        None => &NoopProgressCallback,
    }
}

fn attempt_pdf(
    input_path: &Path,
    output_path: &Path,
    config: &ConversionConfig,
    renderer: &dyn PdfRenderer,
) -> Result<u64, Md2PdfError> {
    match try_convert(input_path, output_path, config, renderer) {
        Ok(bytes) => {
            info!("Wrote {} ({} bytes)", output_path.display(), bytes);
            events(config).on_pdf_written(input_path, output_path, bytes);
            Ok(bytes)
        }
        Err(e) => {
            warn!("PDF conversion failed: {}", e);
            events(config).on_pdf_failed(&e);
            Err(e)
        }
    }
}

fn attempt_fallback(
    input_path: &Path,
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<PathBuf, Md2PdfError> {
    match write_html_fallback(input_path, output_path, config) {
        Ok(path) => {
            info!("Wrote HTML fallback {}", path.display());
            events(config).on_fallback_written(&path);
            Ok(path)
        }
        Err(e) => {
            warn!("HTML fallback failed: {}", e);
            events(config).on_fallback_failed(&e);
            Err(e)
        }
    }
}
