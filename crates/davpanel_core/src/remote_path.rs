use std::string::FromUtf8Error;

/// Canonical form used to compare remote paths: leading `/`, no trailing `/`,
/// no empty segments. The root normalizes to `/`.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Last non-empty segment of a path, ignoring a trailing separator.
pub fn last_segment(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Percent-decode a path taken from a server response.
pub fn decode_path(raw: &str) -> Result<String, FromUtf8Error> {
    urlencoding::decode(raw).map(|decoded| decoded.into_owned())
}

/// Percent-encode each segment of a decoded path, keeping the separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
