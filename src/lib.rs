//! # pdftagmeta
//!
//! A Rust library for pulling labeled paragraphs out of a PDF and storing them
//! in the document's metadata.
//!
//! ## What this crate does
//!
//! 1. **Read text** — extracts the text of every page, joining pages with a
//!    blank line.
//! 2. **Filter tags** *(optional)* — keeps only the candidate tags that appear
//!    as bold lines in the document.
//! 3. **Locate tags** — finds each tag and captures the paragraph that follows
//!    it, stopping at a blank line, at the next tag, or at the end of the text.
//! 4. **Write metadata** — merges the normalized paragraphs into the `/Info`
//!    dictionary and saves a new PDF.
//!
//! ## Quick example
//!
//! ```no_run
//! use pdftagmeta::{PdfTagger, RunOutcome, TaggerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TaggerConfig::new("case-study.pdf", "case-study_with_metadata.pdf");
//! let mut tagger = PdfTagger::with_config(config)?;
//!
//! match tagger.run()? {
//!     RunOutcome::Written(report) => {
//!         for (tag, content) in &report.tag_data {
//!             println!("{tag}: {content}");
//!         }
//!         println!("wrote {}", report.output_path.display());
//!     }
//!     RunOutcome::NoBoldTags => println!("no bold tags found"),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

mod bold;
mod locator;
mod metadata;
mod normalize;
mod pdf_utils;
mod tagger;
mod tagger_extraction;
mod tagger_metadata;
mod text;

pub use bold::{filter_bold_tags, BoldRunDetector};
pub use locator::{extract, tag_data, TagLocator, TagMatch};
pub use metadata::{metadata_key, METADATA_KEY_MARKER};
pub use normalize::normalize;
pub use tagger::{PdfTagger, RunOutcome, TagReport};
pub use text::PAGE_SEPARATOR;

/// Tag name → normalized paragraph, in candidate-list order.
pub type TagData = indexmap::IndexMap<String, String>;

/// Tags searched for when the caller supplies none of their own.
pub const DEFAULT_TAGS: &[&str] = &["The Challenge", "The Approach", "The Results"];

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`PdfTagger`].
#[derive(Debug, Clone)]
pub struct TaggerConfig {
    /// PDF to read.
    pub input_path: PathBuf,

    /// Where the PDF with merged metadata is written.
    pub output_path: PathBuf,

    /// Candidate tags, in the order their entries should appear.
    pub tags: Vec<String>,

    /// When `true`, only tags that appear as bold lines in the document are
    /// searched for. If none do, [`PdfTagger::run`] returns
    /// [`RunOutcome::NoBoldTags`] without writing anything.
    pub bold_only: bool,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_path: PathBuf::new(),
            tags: DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            bold_only: false,
        }
    }
}

impl TaggerConfig {
    /// Configuration with the default tag list.
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input_path: I, output_path: O) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            ..Default::default()
        }
    }

    /// Returns an error when no candidate tag contains anything but whitespace.
    pub fn validate(&self) -> Result<()> {
        if self.tags.iter().all(|t| t.trim().is_empty()) {
            return Err(TagError::Config("no candidate tags supplied".into()));
        }
        Ok(())
    }
}

/// Output path used when none is given: `<stem>_with_metadata.pdf` beside the
/// input.
///
/// ```
/// # use pdftagmeta::default_output_path;
/// # use std::path::Path;
/// assert_eq!(
///     default_output_path(Path::new("docs/study.pdf")),
///     Path::new("docs/study_with_metadata.pdf"),
/// );
/// ```
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".into());
    input.with_file_name(format!("{stem}_with_metadata.pdf"))
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum TagError {
    /// A filesystem I/O error occurred (e.g. when loading or saving a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying lopdf parser returned an error.
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),

    /// A tag could not be turned into a search pattern.
    #[error("invalid tag pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The configuration cannot drive a run.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, TagError>;
