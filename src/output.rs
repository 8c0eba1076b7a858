//! Result types returned by the top-level converter.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What a successful [`crate::convert::run`] produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// The PDF was rendered and written.
    Pdf {
        path: PathBuf,
        /// File size on disk.
        bytes: u64,
    },
    /// PDF rendering failed; the HTML fallback was written instead.
    HtmlFallback {
        path: PathBuf,
        /// Why the PDF could not be produced.
        pdf_error: String,
    },
}

impl ConversionOutcome {
    /// Path of the artifact that was written.
    pub fn path(&self) -> &Path {
        match self {
            ConversionOutcome::Pdf { path, .. } => path,
            ConversionOutcome::HtmlFallback { path, .. } => path,
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, ConversionOutcome::Pdf { .. })
    }
}
