//! Whole-document text, as the tag locator sees it.

use log::{debug, warn};
use lopdf::Document;

/// Placed between the text of consecutive pages so a page boundary always
/// ends a paragraph.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Concatenate the text of every page, in page order, separated by
/// [`PAGE_SEPARATOR`]. The result is trimmed.
///
/// Text lopdf cannot decode, such as strings in a font without a usable
/// encoding, is dropped with a warning; the rest of the page is kept.
pub(crate) fn document_text(document: &Document) -> String {
    let mut text = String::new();

    for page_number in document.get_pages().keys() {
        let mut page_text = String::new();
        for chunk in document.extract_text_chunks(&[*page_number]) {
            match chunk {
                Ok(chunk) => page_text.push_str(&chunk),
                Err(e) => warn!("page {page_number}: skipped undecodable text: {e}"),
            }
        }
        debug!("page {page_number}: {} characters", page_text.len());
        text.push_str(&page_text);
        text.push_str(PAGE_SEPARATOR);
    }

    text.trim().to_string()
}
