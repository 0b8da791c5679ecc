//! File name sanitization and content-type detection for uploads.
use std::path::Path;

/// Strips control characters and directory components from a file name.
///
/// Both `/` and `\` are treated as separators so that names coming from any
/// platform collapse to their final component. Returns `None` when nothing
/// usable remains.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let filtered: String = raw.chars().filter(|c| !c.is_control()).collect();
    let last = filtered
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match last {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Guesses a MIME type from the file extension, if it has one we recognise.
pub fn guess_content_type(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|_| mime_guess::from_path(name).first())
        .map(|mime| mime.essence_str().to_string())
}
