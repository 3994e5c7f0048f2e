/// Normalizes a raw destination URL before deduplication
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; discard if empty
/// 2. If `strip_query` is set, truncate at the first `?` (the whole query
///    string goes, not individual parameters)
/// 3. Discard if nothing is left
///
/// No validity check is made here. Malformed URLs are kept and surface as
/// fetch failures later.
///
/// # Arguments
///
/// * `raw` - The URL as reported by the source, if any
/// * `strip_query` - Whether to drop the query string
///
/// # Returns
///
/// * `Some(String)` - The normalized URL
/// * `None` - The URL was absent or empty
///
/// # Examples
///
/// ```
/// use landing_monitor::url::normalize_url;
///
/// assert_eq!(
///     normalize_url(Some("https://a.com/x?p=1"), true).as_deref(),
///     Some("https://a.com/x")
/// );
/// assert_eq!(normalize_url(Some(""), true), None);
/// ```
pub fn normalize_url(raw: Option<&str>, strip_query: bool) -> Option<String> {
    let mut url = raw?.trim();

    if strip_query {
        if let Some(idx) = url.find('?') {
            url = &url[..idx];
        }
    }

    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}
