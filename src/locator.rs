use crate::normalize::normalize;
use crate::{Result, TagData};
use log::{debug, info, warn};
use regex::{Regex, RegexBuilder};

/// Number of characters of a capture shown in log previews.
const PREVIEW_CHARS: usize = 100;

// ── TagMatch ─────────────────────────────────────────────────────────────────

/// One located tag and the paragraph captured after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// The tag as supplied by the caller.
    pub tag: String,

    /// Byte offset of the tag occurrence in the searched text.
    pub offset: usize,

    /// The captured paragraph, trimmed but otherwise untouched.
    pub raw: String,

    /// `raw` after [`normalize`].
    pub content: String,
}

impl TagMatch {
    /// The first characters of the raw capture, for console output.
    pub fn preview(&self) -> String {
        self.raw.chars().take(PREVIEW_CHARS).collect()
    }
}

// ── TagLocator ───────────────────────────────────────────────────────────────

/// Finds candidate tags in document text and captures the paragraph that
/// follows each one.
///
/// Every tag is searched for independently across the whole text, so the
/// order of headings in the document does not matter. Only the first
/// case-insensitive occurrence of a tag is used. A capture stops at the
/// earliest of
///
/// - a blank line (newline, optional whitespace, newline),
/// - the start of any candidate tag, the tag itself included,
/// - the end of the text.
///
/// ```
/// use pdftagmeta::TagLocator;
///
/// let locator = TagLocator::new(&["The Challenge", "The Approach"]).unwrap();
/// let data = locator.extract("The Challenge\nToo slow.\nThe Approach\nCache it.");
/// assert_eq!(data["The Challenge"], "Too slow");
/// assert_eq!(data["The Approach"], "Cache it");
/// ```
#[derive(Debug, Clone)]
pub struct TagLocator {
    patterns: Vec<(String, Regex)>,
}

impl TagLocator {
    /// Compile one pattern per non-blank tag. Blank tags are skipped.
    pub fn new<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let tags: Vec<&str> = tags
            .iter()
            .map(|t| t.as_ref())
            .filter(|t| {
                let blank = t.trim().is_empty();
                if blank {
                    warn!("ignoring blank tag {t:?}");
                }
                !blank
            })
            .collect();

        let boundary = tags
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        let patterns = tags
            .iter()
            .map(|tag| -> Result<(String, Regex)> {
                let source = format!(
                    r"{}\s*(.*?)(?:\n\s*\n|\s*(?:{boundary})|\z)",
                    regex::escape(tag)
                );
                let re = RegexBuilder::new(&source)
                    .case_insensitive(true)
                    .dot_matches_new_line(true)
                    .build()?;
                Ok((tag.to_string(), re))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("compiled {} tag patterns", patterns.len());

        Ok(Self { patterns })
    }

    /// The tags this locator searches for, in order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(tag, _)| tag.as_str())
    }

    /// Locate every tag in `text`. Tags that are not found are logged and
    /// left out.
    pub fn locate(&self, text: &str) -> Vec<TagMatch> {
        let mut found = Vec::new();

        for (tag, re) in &self.patterns {
            let Some(caps) = re.captures(text) else {
                info!("tag '{tag}' not found in the document");
                continue;
            };

            let offset = caps.get(0).map_or(0, |m| m.start());
            let raw = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            let content = normalize(&raw);
            let m = TagMatch {
                tag: tag.clone(),
                offset,
                raw,
                content,
            };
            info!("extracted text for '{tag}': {}...", m.preview());
            found.push(m);
        }

        found
    }

    /// Locate every tag and keep the normalized, non-empty paragraphs.
    pub fn extract(&self, text: &str) -> TagData {
        tag_data(&self.locate(text))
    }
}

/// Normalized contents of `matches`, keyed by tag. Matches that normalize to
/// nothing are left out; the first match of a tag wins.
pub fn tag_data(matches: &[TagMatch]) -> TagData {
    let mut data = TagData::new();

    for m in matches {
        if m.content.is_empty() {
            debug!("tag '{}' has no content after normalization", m.tag);
            continue;
        }
        data.entry(m.tag.clone()).or_insert_with(|| m.content.clone());
    }

    data
}

/// Compile `tags` and run [`TagLocator::extract`] over `text`.
pub fn extract<S: AsRef<str>>(text: &str, tags: &[S]) -> Result<TagData> {
    Ok(TagLocator::new(tags)?.extract(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE_STUDY: &str = "The Challenge\nPatients missed follow-ups.\n\nThe Approach\nBuilt a reminder app.";

    #[test]
    fn heading_paragraph_pairs() {
        let data = extract(CASE_STUDY, &["The Challenge", "The Approach"]).unwrap();

        let pairs: Vec<(&str, &str)> = data.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("The Challenge", "Patients missed followups"),
                ("The Approach", "Built a reminder app"),
            ]
        );
    }

    #[test]
    fn output_follows_candidate_order_not_document_order() {
        let data = extract(CASE_STUDY, &["The Approach", "The Challenge"]).unwrap();
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, ["The Approach", "The Challenge"]);
    }

    #[test]
    fn last_tag_runs_to_end_of_text() {
        let text = "Summary\nShort.\n\nResults\nFewer missed visits\nacross all clinics";
        let data = extract(text, &["Results"]).unwrap();
        assert_eq!(data["Results"], "Fewer missed visits across all clinics");
    }

    #[test]
    fn missing_tag_is_absent() {
        let data = extract(CASE_STUDY, &["The Challenge", "The Results"]).unwrap();
        assert!(data.contains_key("The Challenge"));
        assert!(!data.contains_key("The Results"));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn match_is_case_insensitive_but_key_is_preserved() {
        let data = extract("THE CHALLENGE\nit was hard", &["The Challenge"]).unwrap();
        assert_eq!(data["The Challenge"], "it was hard");
    }

    #[test]
    fn next_tag_stops_capture_without_blank_line() {
        let text = "The Challenge\nToo slow.\nThe Approach\nCache it.";
        let data = extract(text, &["The Challenge", "The Approach"]).unwrap();
        assert_eq!(data["The Challenge"], "Too slow");
    }

    #[test]
    fn blank_line_may_contain_whitespace() {
        let data = extract("Intro\nline one\n  \t\nline two", &["Intro"]).unwrap();
        assert_eq!(data["Intro"], "line one");
    }

    #[test]
    fn tag_inside_paragraph_cuts_capture_early() {
        let text = "Team\nThe team met weekly.\nOutcome\nGood.";
        let data = extract(text, &["Team", "Outcome"]).unwrap();
        assert_eq!(data["Team"], "The");
        assert_eq!(data["Outcome"], "Good");
    }

    #[test]
    fn only_first_occurrence_is_captured() {
        let data = extract("Notes\nfirst\n\nNotes\nsecond", &["Notes"]).unwrap();
        assert_eq!(data["Notes"], "first");
    }

    #[test]
    fn empty_capture_produces_no_entry() {
        let text = "The Challenge\nThe Approach\nBuilt it.";
        let data = extract(text, &["The Challenge", "The Approach"]).unwrap();
        assert!(!data.contains_key("The Challenge"));
        assert_eq!(data["The Approach"], "Built it");
    }

    #[test]
    fn tags_with_regex_metacharacters_are_literal() {
        let text = "Cost (USD)\n$1.2M saved\n\nOther";
        let data = extract(text, &["Cost (USD)", "Other"]).unwrap();
        assert_eq!(data["Cost (USD)"], "12M saved");
    }

    #[test]
    fn blank_tags_are_ignored() {
        let locator = TagLocator::new(&["", "  ", "Results"]).unwrap();
        assert_eq!(locator.tags().collect::<Vec<_>>(), ["Results"]);
        let data = locator.extract("Results\ndone");
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn locate_reports_raw_capture_and_offset() {
        let locator = TagLocator::new(&["The Approach"]).unwrap();
        let matches = locator.locate(CASE_STUDY);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw, "Built a reminder app.");
        assert_eq!(matches[0].offset, CASE_STUDY.find("The Approach").unwrap());
        assert_eq!(matches[0].preview(), "Built a reminder app.");
    }

    #[test]
    fn values_are_clean_for_every_present_tag() {
        let text = "A:\n  x -- y!!  \n\nB:\n\tz\u{00e9}";
        let data = extract(text, &["A:", "B:"]).unwrap();
        for value in data.values() {
            assert!(!value.is_empty());
            assert!(value.chars().all(|c| c.is_ascii_alphanumeric() || c == ' '));
            assert_eq!(value.trim(), value);
        }
    }
}
