//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ markdown ──▶ template ──▶ render ──▶ write
//! (read)    (+toc,        (styled     (wkhtml-   (atomic)
//!            highlight)    document)   topdf)
//! ```
//!
//! 1. [`input`]     — read the source file as UTF-8
//! 2. [`markdown`]  — Markdown → HTML fragment; applies [`toc`] and
//!    [`highlight`] as event-stream rewrites
//! 3. [`template`]  — wrap the fragment in the fixed document + stylesheet
//! 4. [`render`]    — the injectable [`render::PdfRenderer`] and its
//!    `wkhtmltopdf` implementation; the only stage with process I/O
//! 5. [`write`]     — temp-file-and-rename output

pub mod highlight;
pub mod input;
pub mod markdown;
pub mod render;
pub mod template;
pub mod toc;
pub mod write;
