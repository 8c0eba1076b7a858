//! Heading anchors and table-of-contents generation (the `toc` extension).
//!
//! Every heading receives an `id` derived from its text so that the
//! generated index, and any hand-written `[link](#section)`, can target it.
//! Slugs follow the familiar Python-Markdown rules so existing intra-document
//! links keep working:
//!
//! 1. NFKD-decompose and drop everything outside ASCII (`Café` → `Cafe`)
//! 2. drop every character that is not a word character, whitespace or `-`
//! 3. trim and lower-case
//! 4. collapse runs of whitespace and hyphens into a single `-`
//! 5. de-duplicate with a numeric suffix: `intro`, `intro_1`, `intro_2`

use crate::pipeline::markdown::escape_html;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Marker paragraph replaced by the generated index.
pub const TOC_MARKER: &str = "[TOC]";

static RE_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static RE_HYPHENATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());
static RE_COUNTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*)_([0-9]+)$").unwrap());

/// One heading as it appears in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading level, 1–6.
    pub level: u32,
    /// Unique anchor id.
    pub id: String,
    /// Plain heading text (unescaped).
    pub text: String,
}

/// Turn heading text into an anchor slug. Not de-duplicated.
pub fn slugify(text: &str) -> String {
    let ascii: String = text.nfkd().filter(char::is_ascii).collect();
    let stripped = RE_STRIP.replace_all(&ascii, "");
    let lowered = stripped.trim().to_lowercase();
    RE_HYPHENATE.replace_all(&lowered, "-").into_owned()
}

/// Hands out unique ids for one document.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    used: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a unique id for `candidate`, suffixing `_N` on collision.
    pub fn claim(&mut self, candidate: &str) -> String {
        let mut id = candidate.to_string();
        while id.is_empty() || self.used.contains(&id) {
            id = match RE_COUNTED.captures(&id) {
                Some(caps) => {
                    let n: u64 = caps[2].parse().unwrap_or(0);
                    format!("{}_{}", &caps[1], n + 1)
                }
                None => format!("{id}_1"),
            };
        }
        self.used.insert(id.clone());
        id
    }
}

/// Render the index as nested lists inside `<div class="toc">`.
///
/// A heading deeper than its predecessor opens a nested list; a heading at
/// or above the parent list's level closes lists until it fits. Skipped
/// levels (`#` then `###`) nest one step, not two.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let mut out = String::from("<div class=\"toc\">\n");
    if entries.is_empty() {
        out.push_str("<ul></ul>\n</div>\n");
        return out;
    }

    // Level of the first heading in each open <ul>.
    let mut open: Vec<u32> = Vec::new();

    for entry in entries {
        match open.last().copied() {
            None => {
                out.push_str("<ul>\n");
                open.push(entry.level);
            }
            Some(top) if entry.level > top => {
                out.push_str("\n<ul>\n");
                open.push(entry.level);
            }
            Some(_) => {
                out.push_str("</li>\n");
                while open.len() > 1 && entry.level <= open[open.len() - 2] {
                    out.push_str("</ul>\n</li>\n");
                    open.pop();
                }
            }
        }
        out.push_str(&format!(
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&entry.id),
            escape_html(&entry.text)
        ));
    }

    out.push_str("</li>\n");
    for _ in 1..open.len() {
        out.push_str("</ul>\n</li>\n");
    }
    out.push_str("</ul>\n</div>\n");
    out
}
