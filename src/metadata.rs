//! Reading and merging the document-information (`/Info`) dictionary.

use crate::pdf_utils::decode_pdf_string;
use crate::TagData;
use indexmap::IndexMap;
use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Prefix that marks a PDF name object, and with it a custom metadata key.
pub const METADATA_KEY_MARKER: char = '/';

/// The metadata field a tag is stored under, as it appears in PDF syntax.
///
/// ```
/// # use pdftagmeta::metadata_key;
/// assert_eq!(metadata_key("The Challenge"), "/The Challenge");
/// ```
pub fn metadata_key(tag: &str) -> String {
    format!("{METADATA_KEY_MARKER}{tag}")
}

/// Where the current `/Info` dictionary lives, if it is usable at all.
fn existing_info(document: &Document) -> (Option<ObjectId>, Dictionary) {
    match document.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => match document.get_object(*id).and_then(Object::as_dict) {
            Ok(dict) => (Some(*id), dict.clone()),
            Err(e) => {
                debug!("/Info reference {id:?} is unusable ({e}); starting fresh");
                (None, Dictionary::new())
            }
        },
        Ok(Object::Dictionary(dict)) => (None, dict.clone()),
        Ok(other) => {
            debug!("/Info is not a dictionary ({other:?}); starting fresh");
            (None, Dictionary::new())
        }
        Err(_) => (None, Dictionary::new()),
    }
}

/// Merge `entries` into the document's `/Info` dictionary.
///
/// Existing keys are kept unless a tag has the same name, in which case the
/// tag's value replaces them. A missing or malformed `/Info` is treated as
/// empty and replaced by a new indirect dictionary.
pub(crate) fn merge_info(document: &mut Document, entries: &TagData) {
    let (id, mut info) = existing_info(document);

    for (tag, content) in entries {
        info.set(tag.as_str(), Object::string_literal(content.as_str()));
    }

    match id {
        Some(id) => {
            document.objects.insert(id, Object::Dictionary(info));
        }
        None => {
            let id = document.add_object(info);
            document.trailer.set("Info", id);
        }
    }
}

/// Every `/Info` entry whose value is a string, name or number, keyed by the
/// name without its marker.
pub(crate) fn read_info(document: &Document) -> IndexMap<String, String> {
    let (_, info) = existing_info(document);

    info.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Object::String(bytes, _) => decode_pdf_string(bytes),
                Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
                Object::Integer(i) => i.to_string(),
                Object::Real(r) => r.to_string(),
                _ => return None,
            };
            Some((String::from_utf8_lossy(key).into_owned(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn tag_data(pairs: &[(&str, &str)]) -> TagData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn with_info(info: Object) -> Document {
        let mut doc = Document::with_version("1.5");
        doc.trailer.set("Info", info);
        doc
    }

    #[test]
    fn creates_info_when_missing() {
        let mut doc = Document::with_version("1.5");
        merge_info(&mut doc, &tag_data(&[("The Challenge", "Too slow")]));

        let info = read_info(&doc);
        assert_eq!(info.get("The Challenge").map(String::as_str), Some("Too slow"));
        assert!(doc.trailer.get(b"Info").unwrap().as_reference().is_ok());
    }

    #[test]
    fn keeps_unrelated_keys_and_overwrites_collisions() {
        let mut doc = Document::with_version("1.5");
        let id = doc.add_object(dictionary! {
            "Title" => Object::string_literal("Case Study"),
            "The Approach" => Object::string_literal("stale"),
        });
        doc.trailer.set("Info", id);

        merge_info(&mut doc, &tag_data(&[("The Approach", "Cache it")]));

        let info = read_info(&doc);
        assert_eq!(info["Title"], "Case Study");
        assert_eq!(info["The Approach"], "Cache it");
        assert_eq!(doc.trailer.get(b"Info").unwrap().as_reference().unwrap(), id);
    }

    #[test]
    fn second_merge_supersedes_first() {
        let mut doc = Document::with_version("1.5");
        merge_info(&mut doc, &tag_data(&[("A", "one"), ("B", "two")]));
        merge_info(&mut doc, &tag_data(&[("B", "three")]));

        let info = read_info(&doc);
        assert_eq!(info["A"], "one");
        assert_eq!(info["B"], "three");
    }

    #[test]
    fn inline_info_is_preserved() {
        let mut doc = with_info(Object::Dictionary(dictionary! {
            "Author" => Object::string_literal("Clinic"),
        }));
        merge_info(&mut doc, &tag_data(&[("Results", "Fewer misses")]));

        let info = read_info(&doc);
        assert_eq!(info["Author"], "Clinic");
        assert_eq!(info["Results"], "Fewer misses");
    }

    #[test]
    fn malformed_info_is_treated_as_empty() {
        let mut doc = with_info(Object::Integer(7));
        assert!(read_info(&doc).is_empty());

        merge_info(&mut doc, &tag_data(&[("Results", "ok")]));
        assert_eq!(read_info(&doc)["Results"], "ok");
    }

    #[test]
    fn dangling_info_reference_is_treated_as_empty() {
        let mut doc = with_info(Object::Reference((99, 0)));
        assert!(read_info(&doc).is_empty());

        merge_info(&mut doc, &tag_data(&[("Results", "ok")]));
        assert_eq!(read_info(&doc).len(), 1);
    }

    #[test]
    fn metadata_key_keeps_spaces() {
        assert_eq!(metadata_key("The Results"), "/The Results");
    }
}
