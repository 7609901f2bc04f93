use crate::metadata::{merge_info, read_info};
use crate::{Result, TagData};
use indexmap::IndexMap;
use std::path::Path;

/// Metadata reading and writing for PdfTagger.
impl super::PdfTagger {
    /// Merge `tag_data` into the document's `/Info` dictionary. Existing
    /// entries survive unless a tag of the same name replaces them.
    pub fn apply_metadata(&mut self, tag_data: &TagData) {
        merge_info(self.document_mut(), tag_data);
    }

    /// All readable `/Info` entries, keyed by name without the `/` marker.
    pub fn metadata(&self) -> IndexMap<String, String> {
        read_info(self.document())
    }

    /// Write the document, with every page and the current metadata, to
    /// `path`.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.document_mut().save(path)?;
        Ok(())
    }

    /// Serialize the document to a byte buffer.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.document_mut().save_to(&mut buf)?;
        Ok(buf)
    }
}
