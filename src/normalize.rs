/// Reduce a captured paragraph to ASCII letters, digits and single spaces.
///
/// Every other character is dropped, whitespace runs (newlines included)
/// collapse to one space, and the result is trimmed. Total and idempotent.
///
/// ```
/// # use pdftagmeta::normalize;
/// assert_eq!(normalize("  Patients missed\nfollow-ups.  "), "Patients missed followups");
/// ```
pub fn normalize(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || is_separator(c))
        .collect();

    kept.split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unicode whitespace plus the information separators U+001C..=U+001F, which
/// PDF text extraction sometimes emits between words.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}
