/// Extension table consulted in order; the first entry found anywhere in the
/// name wins.
const CONTENT_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".jpg", "image/jpeg"),
    (".css", "text/css"),
    (".js", "application/javascript"),
];

/// Returns the MIME type for a file name, or `""` when no extension matches.
///
/// An empty result is still sent as an (empty) `Content-Type` header.
///
/// ```
/// # use docroot::http::mime::content_type;
/// assert_eq!(content_type("/style.css"), "text/css");
/// assert_eq!(content_type("/notes.txt"), "");
/// ```
pub fn content_type(name: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(ext, _)| name.contains(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_decides_ties() {
        // ".html" precedes ".js" in the table
        assert_eq!(content_type("/bundle.js.html"), "text/html");
    }
}
