//! CLI binary for edgequake-md2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints status lines.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_md2pdf::pipeline::highlight;
use edgequake_md2pdf::{
    run, ConversionConfig, ConversionProgressCallback, Md2PdfError, PageSize, ProgressCallback,
    WkHtmlToPdf, DEFAULT_INPUT, DEFAULT_OUTPUT,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

/// `1234567` → `1,234,567`.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── CLI status callback ──────────────────────────────────────────────────────

/// Terminal status reporter: a spinner while wkhtmltopdf runs and one
/// line per outcome. Status lines go to stdout, or stderr in `--json` mode so
/// stdout stays machine-readable.
struct CliProgressCallback {
    spinner: ProgressBar,
    quiet: bool,
    json: bool,
}

impl CliProgressCallback {
    fn new(show_progress: bool, quiet: bool, json: bool) -> Arc<Self> {
        let spinner = if show_progress {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar
        } else {
            ProgressBar::hidden()
        };
        Arc::new(Self {
            spinner,
            quiet,
            json,
        })
    }

    fn say(&self, line: String) {
        if self.quiet {
            return;
        }
        self.shout(line);
    }

    /// Like `say`, but shown even in quiet mode.
    fn shout(&self, line: String) {
        self.spinner.suspend(|| {
            if self.json {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        });
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_input_missing(&self, input: &Path) {
        self.shout(input_missing_line(input));
    }

    fn on_render_start(&self, html_len: usize) {
        self.spinner.set_prefix("Rendering");
        self.spinner
            .set_message(format!("{} bytes of HTML via wkhtmltopdf…", html_len));
        self.spinner.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_pdf_written(&self, input: &Path, output: &Path, bytes: u64) {
        self.spinner.finish_and_clear();
        self.say(converted_line(input, output));
        self.say(pdf_size_line(output, bytes));
    }

    fn on_pdf_failed(&self, error: &Md2PdfError) {
        self.spinner.finish_and_clear();
        for line in pdf_failed_lines(error) {
            self.shout(line);
        }
    }

    fn on_fallback_start(&self) {
        self.say(FALLBACK_NOTICE.to_string());
    }

    fn on_fallback_written(&self, path: &Path) {
        self.say(fallback_written_line(path));
    }

    fn on_fallback_failed(&self, error: &Md2PdfError) {
        self.shout(fallback_failed_line(error));
    }
}

// ── Status lines ─────────────────────────────────────────────────────────────

const INSTALL_NOTE: &str = "📝 Note: This method requires wkhtmltopdf to be installed";
const FALLBACK_NOTICE: &str = "🔄 Trying alternative method...";

fn input_missing_line(input: &Path) -> String {
    format!("❌ {} {} not found", red("Error:"), input.display())
}

fn converted_line(input: &Path, output: &Path) -> String {
    format!(
        "✅ {} {} to {}",
        green("Successfully converted"),
        input.display(),
        bold(&output.display().to_string())
    )
}

fn pdf_size_line(output: &Path, bytes: u64) -> String {
    format!(
        "📄 PDF created: {} {}",
        output.display(),
        dim(&format!("({} bytes)", group_thousands(bytes)))
    )
}

/// Error line plus the install note. Any PDF failure gets the note, whatever
/// its cause.
fn pdf_failed_lines(error: &Md2PdfError) -> [String; 2] {
    [
        format!("❌ {} {}", red("Error converting to PDF:"), error),
        INSTALL_NOTE.to_string(),
    ]
}

fn fallback_written_line(path: &Path) -> String {
    format!(
        "✅ Created {} - you can open this in browser and print to PDF",
        bold(&path.display().to_string())
    )
}

fn fallback_failed_line(error: &Md2PdfError) -> String {
    format!("❌ {} {}", red("Error creating HTML:"), error)
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert README.md in the current directory to README.pdf
  md2pdf

  # Convert another file
  md2pdf docs/guide.md -o guide.pdf

  # US Letter paper, 1 inch margins
  md2pdf --page-size letter --margin 1in

  # Fail instead of writing the HTML fallback
  md2pdf --no-fallback

  # Machine-readable summary
  md2pdf --json > result.json

OUTPUT:
  On success the PDF is written to --output (default README.pdf).
  If wkhtmltopdf is missing or fails, a browser-ready HTML version is
  written next to it instead (default README.html).

ENVIRONMENT VARIABLES:
  WKHTMLTOPDF_PATH        Path to the wkhtmltopdf binary (default: search PATH)
  MD2PDF_OUTPUT           Default for --output
  MD2PDF_THEME            Default for --theme
  RUST_LOG                Override log filtering (e.g. edgequake_md2pdf=debug)

SETUP:
  Install wkhtmltopdf:
    Debian/Ubuntu:  apt install wkhtmltopdf
    macOS:          brew install --cask wkhtmltopdf
"#;

/// Convert a Markdown file to a styled PDF.
#[derive(Parser, Debug)]
#[command(
    name = "md2pdf",
    version,
    about = "Convert a Markdown file to a styled PDF (with HTML fallback)",
    long_about = "Convert a Markdown file to a styled PDF using wkhtmltopdf. Tables, \
heading anchors with [TOC], fenced code and syntax highlighting are supported. When the \
renderer is unavailable an HTML version is written instead.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown file to convert.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Where to write the PDF.
    #[arg(short, long, env = "MD2PDF_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Where to write the HTML fallback [default: output with .html extension].
    #[arg(long, env = "MD2PDF_FALLBACK_OUTPUT")]
    fallback_output: Option<PathBuf>,

    /// Do not write the HTML fallback when PDF rendering fails.
    #[arg(long)]
    no_fallback: bool,

    /// Document title [default: input file name without extension].
    #[arg(long)]
    title: Option<String>,

    /// Syntax highlighting theme.
    #[arg(long, env = "MD2PDF_THEME", default_value = highlight::DEFAULT_THEME)]
    theme: String,

    /// Print available highlighting themes and exit.
    #[arg(long)]
    list_themes: bool,

    /// Paper size.
    #[arg(long, value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Margin applied to all four sides (e.g. 0.75in, 20mm).
    #[arg(long, default_value = "0.75in")]
    margin: String,

    /// Path to the wkhtmltopdf binary.
    #[arg(long, env = "WKHTMLTOPDF_PATH")]
    wkhtmltopdf: Option<PathBuf>,

    /// Print a JSON summary (ConversionOutcome) on stdout.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long, env = "MD2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MD2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MD2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PageSizeArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::A5 => PageSize::A5,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner and the status lines cover what users need; library INFO
    // logs would only interleave with them.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.list_themes {
        for name in highlight::theme_names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let callback = CliProgressCallback::new(show_progress, cli.quiet, cli.json);
    let config = build_config(&cli, callback)?;
    let renderer = WkHtmlToPdf::from_config(&config);

    // Every failure has already been reported by the callback; here we only
    // pick the exit code and the optional JSON summary.
    let code = match run(&cli.input, &cli.output, &config, &renderer) {
        Ok(outcome) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&outcome).context("Failed to serialise outcome")?
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                let summary = serde_json::json!({ "kind": "error", "error": e.to_string() });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).context("Failed to serialise error")?
                );
            }
            ExitCode::FAILURE
        }
    };

    Ok(code)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Arc<CliProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .page_size(cli.page_size.clone().into())
        .margins(cli.margin.clone())
        .highlight_theme(cli.theme.clone())
        .fallback(!cli.no_fallback)
        .progress_callback(progress as ProgressCallback);

    if let Some(ref title) = cli.title {
        builder = builder.title(title.clone());
    }
    if let Some(ref path) = cli.fallback_output {
        builder = builder.fallback_path(path.clone());
    }
    if let Some(ref path) = cli.wkhtmltopdf {
        builder = builder.renderer_path(path.clone());
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn defaults_match_fixed_paths() {
        let cli = Cli::parse_from(["md2pdf"]);
        assert_eq!(cli.input, PathBuf::from("README.md"));
        assert_eq!(cli.output, PathBuf::from("README.pdf"));
        assert!(!cli.no_fallback);
    }

    #[test]
    fn flags_map_to_config() {
        let cli = Cli::parse_from([
            "md2pdf",
            "guide.md",
            "-o",
            "out/guide.pdf",
            "--page-size",
            "letter",
            "--margin",
            "1in",
            "--no-fallback",
        ]);
        let config = build_config(&cli, CliProgressCallback::new(false, true, false)).unwrap();
        assert_eq!(config.pdf.page_size, PageSize::Letter);
        assert_eq!(config.pdf.margin_left, "1in");
        assert!(!config.fallback);
    }

    #[test]
    fn success_lines() {
        let ok = converted_line(Path::new("README.md"), Path::new("README.pdf"));
        assert!(ok.starts_with("✅ "));
        assert!(ok.contains("Successfully converted"));
        assert!(ok.contains("README.md"));
        assert!(ok.contains("README.pdf"));

        let size = pdf_size_line(Path::new("README.pdf"), 1_234_567);
        assert!(size.starts_with("📄 PDF created: README.pdf"));
        assert!(size.contains("(1,234,567 bytes)"));
    }

    #[test]
    fn every_pdf_failure_carries_install_note() {
        let io = Md2PdfError::OutputWriteFailed {
            path: PathBuf::from("README.pdf"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        let missing = Md2PdfError::RendererNotFound {
            binary: "wkhtmltopdf".into(),
        };
        for error in [io, missing] {
            let [first, note] = pdf_failed_lines(&error);
            assert!(first.starts_with("❌ "));
            assert!(first.contains("Error converting to PDF:"));
            assert!(first.contains(&error.to_string()));
            assert_eq!(note, INSTALL_NOTE);
        }
        let staged = pdf_failed_lines(&Md2PdfError::TempFileFailed(io::Error::other("disk full")));
        assert!(staged[1].contains("requires wkhtmltopdf to be installed"));
    }

    #[test]
    fn fallback_lines() {
        assert_eq!(FALLBACK_NOTICE, "🔄 Trying alternative method...");

        let written = fallback_written_line(Path::new("README.html"));
        assert!(written.starts_with("✅ Created "));
        assert!(written.contains("README.html"));
        assert!(written.ends_with(" - you can open this in browser and print to PDF"));

        let failed = fallback_failed_line(&Md2PdfError::InvalidConfig("x".into()));
        assert!(failed.starts_with("❌ "));
        assert!(failed.contains("Error creating HTML:"));
    }

    #[test]
    fn missing_input_line() {
        let line = input_missing_line(Path::new("README.md"));
        assert!(line.starts_with("❌ "));
        assert!(line.ends_with("README.md not found"));
    }
}
