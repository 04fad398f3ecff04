/// Longest file name stem produced by [`sanitize_filename`]
const MAX_FILENAME_LEN: usize = 100;

/// Convert a page URL to a string usable as a file name stem
pub fn sanitize_filename(url: &str) -> String {
    // Drop the scheme, keep host and path
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let name: String = rest
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_FILENAME_LEN)
        .collect();

    let name = name.trim_matches('_');
    if name.is_empty() {
        "page".to_string()
    } else {
        name.to_string()
    }
}
