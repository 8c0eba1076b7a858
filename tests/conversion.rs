//! Integration tests for the conversion chain.
//!
//! These run the full `run` pipeline against fake renderers, so they need
//! neither wkhtmltopdf nor network access.
//!
//! Run with:
//!   cargo test --test conversion

use edgequake_md2pdf::{
    convert, convert_to_html_fallback, render_document, run, write_html_fallback, ConversionConfig,
    ConversionOutcome, ConversionProgressCallback, Md2PdfError, PdfOptions, PdfRenderer,
    ProgressCallback,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

const FAKE_PDF: &[u8] = b"%PDF-1.4 fake";

/// Renderer that always succeeds and records every document it was given.
#[derive(Default)]
struct AlwaysOk {
    seen: Mutex<Vec<String>>,
}

impl PdfRenderer for AlwaysOk {
    fn render(&self, html: &str, _options: &PdfOptions) -> Result<Vec<u8>, Md2PdfError> {
        self.seen.lock().unwrap().push(html.to_string());
        Ok(FAKE_PDF.to_vec())
    }
}

/// Renderer that behaves as if wkhtmltopdf were not installed.
struct AlwaysFail;

impl PdfRenderer for AlwaysFail {
    fn render(&self, _html: &str, _options: &PdfOptions) -> Result<Vec<u8>, Md2PdfError> {
        Err(Md2PdfError::RendererNotFound {
            binary: "wkhtmltopdf".into(),
        })
    }
}

/// Callback that records event names in order.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<&'static str>>,
}

impl Recorder {
    fn push(&self, name: &'static str) {
        self.events.lock().unwrap().push(name);
    }

    fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversionProgressCallback for Recorder {
    fn on_conversion_start(&self, _input: &Path, _output: &Path) {
        self.push("start");
    }
    fn on_input_missing(&self, _input: &Path) {
        self.push("input_missing");
    }
    fn on_render_start(&self, _html_len: usize) {
        self.push("render");
    }
    fn on_pdf_written(&self, _input: &Path, _output: &Path, _bytes: u64) {
        self.push("pdf_written");
    }
    fn on_pdf_failed(&self, _error: &Md2PdfError) {
        self.push("pdf_failed");
    }
    fn on_fallback_start(&self) {
        self.push("fallback_start");
    }
    fn on_fallback_written(&self, _path: &Path) {
        self.push("fallback_written");
    }
    fn on_fallback_failed(&self, _error: &Md2PdfError) {
        self.push("fallback_failed");
    }
}

struct Workspace {
    _dir: tempfile::TempDir,
    input: PathBuf,
    pdf: PathBuf,
    html: PathBuf,
}

fn workspace(markdown: &str) -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("README.md");
    std::fs::write(&input, markdown).unwrap();
    Workspace {
        pdf: dir.path().join("README.pdf"),
        html: dir.path().join("README.html"),
        input,
        _dir: dir,
    }
}

fn with_recorder() -> (ConversionConfig, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone() as ProgressCallback)
        .build()
        .unwrap();
    (config, recorder)
}

const VOID_ELEMENTS: &[&str] = &["meta", "br", "hr", "img", "input", "link"];

/// Assert every opened tag is closed in order. Void elements, comments and
/// the doctype are skipped.
fn assert_balanced(html: &str) {
    let mut stack: Vec<String> = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find('<') {
        rest = &rest[start + 1..];
        let end = rest.find('>').expect("unterminated tag");
        let tag = &rest[..end];
        rest = &rest[end + 1..];

        if tag.starts_with('!') {
            continue;
        }
        let self_closing = tag.ends_with('/');
        if let Some(name) = tag.strip_prefix('/') {
            let name = name.trim().to_ascii_lowercase();
            let open = stack.pop().unwrap_or_default();
            assert_eq!(open, name, "mismatched closing tag in:\n{html}");
            continue;
        }
        let name = tag
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            continue;
        }
        stack.push(name);
    }
    assert!(stack.is_empty(), "unclosed tags {stack:?} in:\n{html}");
}

// ── Document shape ───────────────────────────────────────────────────────────

#[test]
fn table_code_and_headings_reach_the_renderer() {
    let ws = workspace(
        "# Title\n\n## Section\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n```python\nprint(1)\n```\n",
    );
    let renderer = AlwaysOk::default();
    let outcome = run(&ws.input, &ws.pdf, &ConversionConfig::default(), &renderer).unwrap();
    assert!(outcome.is_pdf());

    let seen = renderer.seen.lock().unwrap();
    let html = &seen[0];
    assert!(html.contains("<table>"));
    assert!(html.contains("<pre>"));
    assert!(html.contains("<code"));
    assert!(html.contains("<h1 id=\"title\">"));
    assert!(html.contains("<h2 id=\"section\">"));
    assert!(html.contains("<title>README</title>"));
}

#[test]
fn rendering_is_deterministic() {
    let ws = workspace("# A\n\n[TOC]\n\n## B\n\n```rust\nfn main() {}\n```\n");
    let renderer = AlwaysOk::default();
    let config = ConversionConfig::default();
    run(&ws.input, &ws.pdf, &config, &renderer).unwrap();
    run(&ws.input, &ws.pdf, &config, &renderer).unwrap();

    let seen = renderer.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn documents_are_well_formed() {
    let config = ConversionConfig::default();
    for source in [
        "",
        "# Only a heading\n",
        "- one\n  - nested\n    - deeper\n- two\n",
        "# A\n\n[TOC]\n\n## B\n\n### C\n\n## D\n",
    ] {
        let html = render_document(source, "doc", &config).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_balanced(&html);
    }
}

// ── Outcomes ─────────────────────────────────────────────────────────────────

#[test]
fn success_writes_pdf_only() {
    let ws = workspace("# Hello\n");
    let (config, recorder) = with_recorder();
    let outcome = run(&ws.input, &ws.pdf, &config, &AlwaysOk::default()).unwrap();

    assert_eq!(
        outcome,
        ConversionOutcome::Pdf {
            path: ws.pdf.clone(),
            bytes: FAKE_PDF.len() as u64,
        }
    );
    assert_eq!(std::fs::read(&ws.pdf).unwrap(), FAKE_PDF);
    assert!(!ws.html.exists());
    assert_eq!(recorder.events(), ["start", "render", "pdf_written"]);
}

#[test]
fn renderer_failure_falls_back_to_html() {
    let ws = workspace("# Hello\n\n| a |\n|---|\n| 1 |\n");
    let (config, recorder) = with_recorder();
    let outcome = run(&ws.input, &ws.pdf, &config, &AlwaysFail).unwrap();

    match outcome {
        ConversionOutcome::HtmlFallback { ref path, ref pdf_error } => {
            assert_eq!(path, &ws.html);
            assert!(pdf_error.contains("wkhtmltopdf"));
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    assert!(!ws.pdf.exists());
    let html = std::fs::read_to_string(&ws.html).unwrap();
    assert!(html.contains("<table>"));
    assert!(html.contains("Hello"));
    assert_balanced(&html);
    assert_eq!(
        recorder.events(),
        ["start", "render", "pdf_failed", "fallback_start", "fallback_written"]
    );
}

#[test]
fn missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("README.md");
    let pdf = dir.path().join("README.pdf");
    let (config, recorder) = with_recorder();

    let err = run(&input, &pdf, &config, &AlwaysOk::default()).unwrap_err();
    assert!(matches!(err, Md2PdfError::FileNotFound { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(recorder.events(), ["start", "input_missing"]);
}

#[test]
fn disabled_fallback_returns_pdf_error() {
    let ws = workspace("# Hello\n");
    let config = ConversionConfig::builder().fallback(false).build().unwrap();
    let err = run(&ws.input, &ws.pdf, &config, &AlwaysFail).unwrap_err();

    assert!(matches!(err, Md2PdfError::RendererNotFound { .. }));
    assert!(!ws.pdf.exists());
    assert!(!ws.html.exists());
}

#[test]
fn both_paths_failing_is_reported() {
    let ws = workspace("# Hello\n");
    // A regular file where the fallback's parent directory should be.
    let blocker = ws.input.with_file_name("blocker");
    std::fs::write(&blocker, "x").unwrap();

    let recorder = Arc::new(Recorder::default());
    let config = ConversionConfig::builder()
        .fallback_path(blocker.join("README.html"))
        .progress_callback(recorder.clone() as ProgressCallback)
        .build()
        .unwrap();

    let err = run(&ws.input, &ws.pdf, &config, &AlwaysFail).unwrap_err();
    match err {
        Md2PdfError::FallbackFailed { ref pdf_error, .. } => {
            assert!(pdf_error.contains("wkhtmltopdf"));
        }
        other => panic!("expected FallbackFailed, got {other:?}"),
    }
    assert_eq!(recorder.events().last(), Some(&"fallback_failed"));
}

#[test]
fn convert_reports_bool() {
    let ws = workspace("# Hello\n");
    let config = ConversionConfig::default();
    assert!(convert(&ws.input, &ws.pdf, &config, &AlwaysOk::default()));
    assert!(!convert(&ws.input, ws.pdf.with_file_name("other.pdf"), &config, &AlwaysFail));
    assert!(!ws.pdf.with_file_name("other.pdf").exists());
}

#[test]
fn explicit_fallback_path_is_used() {
    let ws = workspace("# Hello\n");
    let target = ws.input.with_file_name("print-me.html");
    let config = ConversionConfig::builder()
        .fallback_path(&target)
        .build()
        .unwrap();
    let path = write_html_fallback(&ws.input, &ws.pdf, &config).unwrap();
    assert_eq!(path, target);
    assert!(target.exists());
    assert!(!ws.html.exists());
}

#[test]
fn html_fallback_reports_through_callback() {
    let ws = workspace("# Hello\n\n```rust\nfn main() {}\n```\n");
    let (config, recorder) = with_recorder();
    convert_to_html_fallback(&ws.input, &ws.pdf, &config);

    let html = std::fs::read_to_string(&ws.html).unwrap();
    assert!(html.contains("<pre><code class=\"language-rust\">"));
    assert!(!ws.pdf.exists());
    assert_eq!(recorder.events(), ["fallback_written"]);
}
