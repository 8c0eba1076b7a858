//! Markdown → HTML fragment.
//!
//! Parsing is pulldown-cmark (CommonMark). The named extensions are applied
//! as rewrites over the event stream before it is handed to pulldown's HTML
//! writer, so each extension stays a small, separately testable pass:
//!
//! ```text
//! parse ──▶ toc (heading ids, [TOC]) ──▶ codehilite (code blocks) ──▶ push_html
//! ```
//!
//! The output is a fragment (no `<html>`/`<body>`); [`crate::pipeline::template`]
//! wraps it into a full document.

use crate::config::MarkdownExtensions;
use crate::error::Md2PdfError;
use crate::pipeline::highlight::highlight_block;
use crate::pipeline::toc::{render_toc, slugify, SlugRegistry, TocEntry, TOC_MARKER};
use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use tracing::debug;

/// Convert Markdown source to an HTML fragment using the given extensions.
///
/// Deterministic: the same source and extensions always produce the same
/// bytes.
pub fn to_html(source: &str, ext: &MarkdownExtensions) -> Result<String, Md2PdfError> {
    let events: Vec<Event<'_>> = Parser::new_ext(source, parser_options(ext)).collect();

    let events = if ext.toc { apply_toc(events) } else { events };
    let events = if ext.codehilite {
        highlight_code_blocks(events)?
    } else {
        events
    };

    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, events.into_iter());
    debug!(
        "Markdown ({}) → {} bytes of HTML",
        ext.names().join(", "),
        out.len()
    );
    Ok(out)
}

/// HTML-escape `s` for use in text or a double-quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    // Writing into a String cannot fail.
    let _ = pulldown_cmark::escape::escape_html(&mut out, s);
    out
}

fn parser_options(ext: &MarkdownExtensions) -> Options {
    let mut opts = Options::empty();
    if ext.tables {
        opts.insert(Options::ENABLE_TABLES);
    }
    opts
}

fn heading_rank(level: HeadingLevel) -> u32 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

// ── toc ──────────────────────────────────────────────────────────────────

/// First pass: every heading's level, plain text and unique id, in order.
fn collect_headings(events: &[Event<'_>]) -> Vec<TocEntry> {
    let mut registry = SlugRegistry::new();
    let mut entries = Vec::new();
    let mut current: Option<(u32, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => {
                current = Some((heading_rank(*level), String::new()));
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some((_, ref mut text)) = current {
                    text.push_str(t);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, ref mut text)) = current {
                    text.push(' ');
                }
            }
            Event::End(Tag::Heading(..)) => {
                if let Some((level, text)) = current.take() {
                    let text = text.trim().to_string();
                    let id = registry.claim(&slugify(&text));
                    entries.push(TocEntry { level, id, text });
                }
            }
            _ => {}
        }
    }
    entries
}

/// If the paragraph opening at `start` is exactly `[TOC]`, return the index
/// of its closing event.
fn toc_marker_end(events: &[Event<'_>], start: usize) -> Option<usize> {
    let mut text = String::new();
    for (offset, event) in events[start + 1..].iter().enumerate() {
        match event {
            Event::Text(t) => text.push_str(t),
            Event::End(Tag::Paragraph) => {
                return (text.trim() == TOC_MARKER).then_some(start + 1 + offset);
            }
            _ => return None,
        }
    }
    None
}

/// Second pass: give headings their ids and expand `[TOC]` paragraphs.
fn apply_toc<'a>(events: Vec<Event<'a>>) -> Vec<Event<'a>> {
    let entries = collect_headings(&events);
    let index = render_toc(&entries);
    let mut ids = entries.iter();
    let mut out = Vec::with_capacity(events.len());

    let mut i = 0;
    while i < events.len() {
        match &events[i] {
            Event::Start(Tag::Paragraph) => {
                if let Some(end) = toc_marker_end(&events, i) {
                    out.push(Event::Html(index.clone().into()));
                    i = end + 1;
                    continue;
                }
            }
            Event::Start(Tag::Heading(level, _, _)) => {
                if let Some(entry) = ids.next() {
                    out.push(Event::Html(
                        format!(
                            "<h{} id=\"{}\">",
                            heading_rank(*level),
                            escape_html(&entry.id)
                        )
                        .into(),
                    ));
                    i += 1;
                    continue;
                }
            }
            Event::End(Tag::Heading(level, _, _)) => {
                out.push(Event::Html(format!("</h{}>\n", heading_rank(*level)).into()));
                i += 1;
                continue;
            }
            _ => {}
        }
        out.push(events[i].clone());
        i += 1;
    }
    out
}

// ── codehilite ───────────────────────────────────────────────────────────

fn highlight_code_blocks(events: Vec<Event<'_>>) -> Result<Vec<Event<'_>>, Md2PdfError> {
    let mut out = Vec::with_capacity(events.len());
    // (language, accumulated code) while inside a code block
    let mut block: Option<(Option<String>, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                block = Some((lang, String::new()));
            }
            Event::End(Tag::CodeBlock(_)) => {
                if let Some((lang, code)) = block.take() {
                    out.push(Event::Html(highlight_block(&code, lang.as_deref())?.into()));
                }
            }
            Event::Text(t) if block.is_some() => {
                if let Some((_, ref mut code)) = block {
                    code.push_str(&t);
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}
