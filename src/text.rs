/// Marker appended to text cut short by [`sample_text`]
pub const ELLIPSIS: &str = "...";

/// Trims the text and collapses every run of whitespace into a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Short, single-line excerpt of an element's text.
///
/// Whitespace is collapsed first; if more than `max_len` characters remain
/// the excerpt is cut at `max_len` and [`ELLIPSIS`] is appended.
pub fn sample_text(text: &str, max_len: usize) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.chars().count() <= max_len {
        return collapsed;
    }

    let mut sample: String = collapsed.chars().take(max_len).collect();
    sample.push_str(ELLIPSIS);
    sample
}

/// Truncates a label for display without splitting a character
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        text.chars().take(max_len).collect()
    }
}
