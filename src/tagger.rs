use crate::locator::tag_data;
use crate::{default_output_path, Result, TagData, TagError, TagMatch, TaggerConfig};
use log::info;
use lopdf::Document;
use std::path::{Path, PathBuf};

// ── RunOutcome ────────────────────────────────────────────────────────────────

/// How a [`PdfTagger::run`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Tags were extracted and the output PDF was written.
    Written(TagReport),

    /// `bold_only` was set and none of the candidate tags is bold in the
    /// document. Nothing was extracted or written.
    NoBoldTags,
}

/// What a completed run searched for, found and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReport {
    /// The file the tagged PDF was written to.
    pub output_path: PathBuf,

    /// Tags that were searched for, after any bold filtering.
    pub tags: Vec<String>,

    /// Every tag that was found, with its raw capture.
    pub matches: Vec<TagMatch>,

    /// The entries merged into the document metadata.
    pub tag_data: TagData,
}

impl TagReport {
    /// Searched tags that did not occur in the document.
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|tag| !self.matches.iter().any(|m| m.tag == *tag))
    }
}

// ── PdfTagger ─────────────────────────────────────────────────────────────────

/// Entry point for reading tags out of a PDF and writing them into its
/// metadata.
///
/// # Creating a tagger
///
/// ```no_run
/// use pdftagmeta::{PdfTagger, TaggerConfig};
///
/// // From a file path, with the default tags and output path
/// let t = PdfTagger::from_path("study.pdf").unwrap();
///
/// // From an in-memory buffer
/// let bytes = std::fs::read("study.pdf").unwrap();
/// let t = PdfTagger::from_bytes(&bytes).unwrap();
///
/// // With custom configuration
/// let cfg = TaggerConfig {
///     tags: vec!["Overview".into(), "Outcome".into()],
///     bold_only: true,
///     ..TaggerConfig::new("study.pdf", "tagged.pdf")
/// };
/// let t = PdfTagger::with_config(cfg).unwrap();
/// ```
pub struct PdfTagger {
    document: Document,
    config: TaggerConfig,
}

impl PdfTagger {
    // ── Constructors ──────────────────────────────────────────────────────────

    /// Load a PDF from the file system. Output goes to
    /// [`default_output_path`] of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::with_config(TaggerConfig::new(path, default_output_path(path)))
    }

    /// Load a PDF from an in-memory byte slice. No output path is set; use
    /// [`PdfTagger::save`] or [`PdfTagger::to_bytes`] to write the result.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self {
            document: Document::load_mem(data)?,
            config: TaggerConfig::default(),
        })
    }

    /// Load `config.input_path` with a custom [`TaggerConfig`].
    pub fn with_config(config: TaggerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            document: Document::load(&config.input_path)?,
            config,
        })
    }

    // ── Pipeline ──────────────────────────────────────────────────────────────

    /// Extract the configured tags and write the output PDF.
    ///
    /// With [`TaggerConfig::bold_only`] set, tags that are not bold in the
    /// document are dropped first; if none remain the run stops with
    /// [`RunOutcome::NoBoldTags`] and nothing is written.
    pub fn run(&mut self) -> Result<RunOutcome> {
        if self.config.output_path.as_os_str().is_empty() {
            return Err(TagError::Config("no output path configured".into()));
        }

        let tags = self.usable_tags();
        if self.config.bold_only && tags.is_empty() {
            info!("no bold tags found in the document");
            return Ok(RunOutcome::NoBoldTags);
        }

        let matches = self.locate_tags(&tags)?;
        let tag_data = tag_data(&matches);
        self.apply_metadata(&tag_data);

        let output_path = self.config.output_path.clone();
        self.save(&output_path)?;
        info!("metadata added to {}", output_path.display());

        Ok(RunOutcome::Written(TagReport {
            output_path,
            tags,
            matches,
            tag_data,
        }))
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// Returns a reference to the underlying [`lopdf::Document`].
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns a reference to the active [`TaggerConfig`].
    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}
