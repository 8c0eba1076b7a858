//! Configuration types for Markdown-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the fixed
//! behaviour of the `md2pdf` tool exactly: full extension set for the PDF,
//! reduced set for the HTML fallback, A4 pages with 0.75in margins.

use crate::error::Md2PdfError;
use crate::pipeline::highlight;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default Markdown source, relative to the working directory.
pub const DEFAULT_INPUT: &str = "README.md";

/// Default PDF destination, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "README.pdf";

/// Configuration for a Markdown-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_md2pdf::{ConversionConfig, PageSize};
///
/// let config = ConversionConfig::builder()
///     .page_size(PageSize::Letter)
///     .margins("1in")
///     .title("Release notes")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Extensions used for the primary (PDF) conversion. Default: [`MarkdownExtensions::FULL`].
    pub extensions: MarkdownExtensions,

    /// Extensions used for the HTML fallback. Default: [`MarkdownExtensions::BASIC`].
    ///
    /// The fallback output is meant to be opened in a browser as-is, so it
    /// skips the highlight stylesheet and keeps to a plain look.
    pub fallback_extensions: MarkdownExtensions,

    /// Options handed to the PDF renderer.
    pub pdf: PdfOptions,

    /// Document `<title>`. If None, the input file stem is used.
    pub title: Option<String>,

    /// syntect theme used to generate the code highlighting stylesheet.
    /// Default: `InspiredGitHub`, which reads well on white paper.
    pub highlight_theme: String,

    /// Write the HTML fallback when PDF rendering fails. Default: true.
    pub fallback: bool,

    /// Where to write the HTML fallback. If None, the PDF path with an
    /// `.html` extension (so `README.pdf` → `README.html`).
    pub fallback_path: Option<PathBuf>,

    /// Explicit path to the `wkhtmltopdf` binary. If None, `PATH` is searched.
    pub renderer_path: Option<PathBuf>,

    /// Status event sink. If None, events are dropped.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            extensions: MarkdownExtensions::FULL,
            fallback_extensions: MarkdownExtensions::BASIC,
            pdf: PdfOptions::default(),
            title: None,
            highlight_theme: highlight::DEFAULT_THEME.to_string(),
            fallback: true,
            fallback_path: None,
            renderer_path: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("extensions", &self.extensions)
            .field("fallback_extensions", &self.fallback_extensions)
            .field("pdf", &self.pdf)
            .field("title", &self.title)
            .field("highlight_theme", &self.highlight_theme)
            .field("fallback", &self.fallback)
            .field("fallback_path", &self.fallback_path)
            .field("renderer_path", &self.renderer_path)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Resolve the fallback HTML path for a given PDF output path.
    pub fn fallback_path_for(&self, output: &Path) -> PathBuf {
        match self.fallback_path {
            Some(ref p) => p.clone(),
            None => output.with_extension("html"),
        }
    }

    /// Resolve the document title for a given input path.
    pub fn title_for(&self, input: &Path) -> String {
        if let Some(ref t) = self.title {
            return t.clone();
        }
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Document".to_string())
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn extensions(mut self, ext: MarkdownExtensions) -> Self {
        self.config.extensions = ext;
        self
    }

    pub fn fallback_extensions(mut self, ext: MarkdownExtensions) -> Self {
        self.config.fallback_extensions = ext;
        self
    }

    pub fn pdf_options(mut self, pdf: PdfOptions) -> Self {
        self.config.pdf = pdf;
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.pdf.page_size = size;
        self
    }

    /// Set all four page margins to the same value, e.g. `"0.75in"` or `"20mm"`.
    pub fn margins(mut self, margin: impl Into<String>) -> Self {
        let m = margin.into();
        self.config.pdf.margin_top = m.clone();
        self.config.pdf.margin_right = m.clone();
        self.config.pdf.margin_bottom = m.clone();
        self.config.pdf.margin_left = m;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn highlight_theme(mut self, theme: impl Into<String>) -> Self {
        self.config.highlight_theme = theme.into();
        self
    }

    pub fn fallback(mut self, enabled: bool) -> Self {
        self.config.fallback = enabled;
        self
    }

    pub fn fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.fallback_path = Some(path.into());
        self
    }

    pub fn renderer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.renderer_path = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2PdfError> {
        let c = &self.config;
        if c.extensions.codehilite && !highlight::theme_exists(&c.highlight_theme) {
            return Err(Md2PdfError::InvalidConfig(format!(
                "Unknown highlight theme '{}'. Available: {}",
                c.highlight_theme,
                highlight::theme_names().join(", ")
            )));
        }
        for (name, value) in [
            ("margin-top", &c.pdf.margin_top),
            ("margin-right", &c.pdf.margin_right),
            ("margin-bottom", &c.pdf.margin_bottom),
            ("margin-left", &c.pdf.margin_left),
        ] {
            if value.trim().is_empty() {
                return Err(Md2PdfError::InvalidConfig(format!(
                    "{name} must not be empty"
                )));
            }
        }
        if c.pdf.encoding.trim().is_empty() {
            return Err(Md2PdfError::InvalidConfig("encoding must not be empty".into()));
        }
        Ok(self.config)
    }
}

// ── Markdown extensions ──────────────────────────────────────────────────

/// Named Markdown extensions, mirroring the classic Python-Markdown set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownExtensions {
    /// GFM pipe tables.
    pub tables: bool,
    /// Heading anchors and `[TOC]` expansion.
    pub toc: bool,
    /// Triple-backtick fenced code. Always parsed by CommonMark; kept so the
    /// extension list round-trips in logs and JSON.
    pub fenced_code: bool,
    /// Syntax highlighting of code blocks.
    pub codehilite: bool,
}

impl MarkdownExtensions {
    /// `tables`, `toc`, `fenced_code`, `codehilite`.
    pub const FULL: Self = Self {
        tables: true,
        toc: true,
        fenced_code: true,
        codehilite: true,
    };

    /// `tables`, `toc`, `fenced_code`.
    pub const BASIC: Self = Self {
        tables: true,
        toc: true,
        fenced_code: true,
        codehilite: false,
    };

    /// Names of the enabled extensions, in canonical order.
    pub fn names(&self) -> Vec<&'static str> {
        [
            (self.tables, "tables"),
            (self.toc, "toc"),
            (self.fenced_code, "fenced_code"),
            (self.codehilite, "codehilite"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }
}

impl Default for MarkdownExtensions {
    fn default() -> Self {
        Self::FULL
    }
}

// ── PDF options ──────────────────────────────────────────────────────────

/// Paper sizes understood by `wkhtmltopdf --page-size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PageSize::A4 => "A4",
            PageSize::A3 => "A3",
            PageSize::A5 => "A5",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
        };
        f.write_str(s)
    }
}

/// Options passed to the HTML-to-PDF renderer.
///
/// Margins are strings with a unit suffix (`in`, `mm`, `cm`) because that is
/// what the renderer accepts verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfOptions {
    pub page_size: PageSize,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub encoding: String,
    /// Emit a PDF outline (bookmarks). Default: false.
    pub outline: bool,
    /// Allow the HTML to reference local files (images, fonts). Default: true.
    pub enable_local_file_access: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_top: "0.75in".to_string(),
            margin_right: "0.75in".to_string(),
            margin_bottom: "0.75in".to_string(),
            margin_left: "0.75in".to_string(),
            encoding: "UTF-8".to_string(),
            outline: false,
            enable_local_file_access: true,
        }
    }
}

impl PdfOptions {
    /// The option mapping: keys with an optional value. Flag options have
    /// no value.
    pub fn entries(&self) -> Vec<(&'static str, Option<String>)> {
        let mut entries = vec![
            ("page-size", Some(self.page_size.to_string())),
            ("margin-top", Some(self.margin_top.clone())),
            ("margin-right", Some(self.margin_right.clone())),
            ("margin-bottom", Some(self.margin_bottom.clone())),
            ("margin-left", Some(self.margin_left.clone())),
            ("encoding", Some(self.encoding.clone())),
        ];
        if !self.outline {
            entries.push(("no-outline", None));
        }
        if self.enable_local_file_access {
            entries.push(("enable-local-file-access", None));
        }
        entries
    }

    /// Render the mapping as `--key [value]` command-line arguments.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (key, value) in self.entries() {
            args.push(format!("--{key}"));
            if let Some(v) = value {
                args.push(v);
            }
        }
        args
    }
}
