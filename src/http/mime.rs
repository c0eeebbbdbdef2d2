//! MIME type detection based on file extensions.

use std::path::Path;

const DEFAULT_MIME: &str = "text/plain";

/// Guesses a content type from the extension of `path`, case-insensitively.
/// Unknown or missing extensions map to `text/plain`.
///
/// ```
/// # use bastion::http::mime::guess_mime_type;
/// assert_eq!(guess_mime_type("site/INDEX.HTML".as_ref()), "text/html");
/// assert_eq!(guess_mime_type("notes".as_ref()), "text/plain");
/// ```
pub fn guess_mime_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME;
    };

    match ext.to_ascii_lowercase().as_str() {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "gif" => "image/gif",
        "png" => "image/png",
        "jpg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => DEFAULT_MIME,
    }
}
