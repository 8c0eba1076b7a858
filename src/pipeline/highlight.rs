//! Syntax highlighting for code blocks (the `codehilite` extension).
//!
//! Highlighting is class-based: each token becomes a `<span>` with
//! space-separated scope classes, and [`stylesheet`] produces the CSS that
//! colours them for a given theme. Class-based output keeps the HTML small
//! and lets the PDF and the stylesheet be regenerated independently.
//!
//! Loading syntect's bundled syntax and theme dumps takes tens of
//! milliseconds, so both sets are loaded lazily once per process.

use crate::error::Md2PdfError;
use crate::pipeline::markdown::escape_html;
use once_cell::sync::Lazy;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

/// Theme used when none is configured. Dark-on-white, prints well.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// True if `name` is one of syntect's bundled themes.
pub fn theme_exists(name: &str) -> bool {
    THEMES.themes.contains_key(name)
}

/// Names of all bundled themes, sorted.
pub fn theme_names() -> Vec<&'static str> {
    THEMES.themes.keys().map(String::as_str).collect()
}

/// CSS for the given theme, matching the classes emitted by [`highlight_block`].
pub fn stylesheet(theme: &str) -> Result<String, Md2PdfError> {
    let theme = THEMES
        .themes
        .get(theme)
        .ok_or_else(|| Md2PdfError::InvalidConfig(format!("Unknown highlight theme '{theme}'")))?;
    css_for_theme_with_class_style(theme, ClassStyle::Spaced)
        .map_err(|e| Md2PdfError::HighlightFailed(e.to_string()))
}

/// Highlight one code block and wrap it in the codehilite container.
///
/// `lang` is the first word of the fence info string. Unknown or missing
/// languages are rendered as escaped plain text inside the same wrapper.
pub fn highlight_block(code: &str, lang: Option<&str>) -> Result<String, Md2PdfError> {
    let syntax = find_syntax(lang);
    debug!("Highlighting {} bytes as {}", code.len(), syntax.name);

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator
            .parse_html_for_line_which_includes_newline(line)
            .map_err(|e| Md2PdfError::HighlightFailed(e.to_string()))?;
    }
    let body = generator.finalize();

    let mut out = String::with_capacity(body.len() + 96);
    out.push_str("<div class=\"codehilite\"><pre><code");
    if let Some(lang) = lang {
        out.push_str(" class=\"language-");
        out.push_str(&escape_html(lang));
        out.push('"');
    }
    out.push('>');
    out.push_str(&body);
    out.push_str("</code></pre></div>\n");
    Ok(out)
}

fn find_syntax(lang: Option<&str>) -> &'static SyntaxReference {
    lang.and_then(|l| SYNTAXES.find_syntax_by_token(l))
        .unwrap_or_else(|| SYNTAXES.find_syntax_plain_text())
}
