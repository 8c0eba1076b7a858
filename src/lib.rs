//! # edgequake-md2pdf
//!
//! Convert a Markdown document to a styled PDF through `wkhtmltopdf`, with an
//! HTML fallback when the renderer is unavailable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! README.md
//!  │
//!  ├─ 1. Input     read as UTF-8
//!  ├─ 2. Markdown  tables, toc, fenced_code, codehilite
//!  ├─ 3. Template  fixed document + print stylesheet
//!  ├─ 4. Render    wkhtmltopdf (A4, 0.75in margins, no outline)
//!  └─ 5. Output    README.pdf, or README.html if step 4 failed
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_md2pdf::{run, ConversionConfig, ConversionOutcome, WkHtmlToPdf};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let renderer = WkHtmlToPdf::from_config(&config);
//!     match run("README.md", "README.pdf", &config, &renderer)? {
//!         ConversionOutcome::Pdf { bytes, .. } => eprintln!("PDF: {bytes} bytes"),
//!         ConversionOutcome::HtmlFallback { path, .. } => eprintln!("HTML: {}", path.display()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Custom renderers
//!
//! [`run`] takes any [`PdfRenderer`]. Tests use fakes that succeed or fail
//! deterministically; other engines can be slotted in the same way.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, MarkdownExtensions, PageSize, PdfOptions,
    DEFAULT_INPUT, DEFAULT_OUTPUT,
};
pub use convert::{
    convert, convert_to_html_fallback, render_document, render_fallback_document, run,
    try_convert, write_html_fallback,
};
pub use error::Md2PdfError;
pub use output::ConversionOutcome;
pub use pipeline::render::{PdfRenderer, WkHtmlToPdf};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
