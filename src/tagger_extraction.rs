use crate::bold::{filter_bold_tags, BoldRunDetector};
use crate::locator::{tag_data, TagLocator, TagMatch};
use crate::text::document_text;
use crate::{Result, TagData};
use log::debug;

/// Text, bold-run and tag extraction for PdfTagger.
impl super::PdfTagger {
    // ── Document content ──────────────────────────────────────────────────────

    /// Text of every page, pages separated by a blank line.
    pub fn document_text(&self) -> String {
        document_text(self.document())
    }

    /// Distinct lines set in a bold font, in order of first appearance.
    pub fn bold_lines(&self) -> Vec<String> {
        BoldRunDetector::new(self.document()).bold_lines()
    }

    // ── Tags ──────────────────────────────────────────────────────────────────

    /// The configured tags, reduced to those rendered as bold lines when
    /// [`TaggerConfig::bold_only`](crate::TaggerConfig::bold_only) is set.
    pub fn usable_tags(&self) -> Vec<String> {
        let config = self.config();
        if !config.bold_only {
            return config.tags.clone();
        }

        let bold = self.bold_lines();
        debug!("bold lines: {bold:?}");
        filter_bold_tags(&config.tags, &bold)
    }

    /// Locate `tags` in the document text. Tags that are not found are left
    /// out.
    pub fn locate_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<Vec<TagMatch>> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }
        let locator = TagLocator::new(tags)?;
        Ok(locator.locate(&self.document_text()))
    }

    /// Locate `tags` and return their normalized, non-empty paragraphs.
    pub fn extract_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<TagData> {
        Ok(tag_data(&self.locate_tags(tags)?))
    }
}
