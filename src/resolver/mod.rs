use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::TranscriptError;

lazy_static! {
    static ref BARE_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();

    /// Accepted URL shapes, in priority order. The trailing group rejects ids
    /// longer than 11 characters while letting `&`, `?`, `#` or `/` follow.
    static ref URL_PATTERNS: [(&'static str, Regex); 4] = [
        (
            "watch",
            Regex::new(r"/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)").unwrap(),
        ),
        (
            "short link",
            Regex::new(r"youtu\.be/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)").unwrap(),
        ),
        (
            "embed",
            Regex::new(r"/embed/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)").unwrap(),
        ),
        (
            "legacy",
            Regex::new(r"/v/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)").unwrap(),
        ),
    ];
}

/// A validated 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check whether a string has the shape of a bare video identifier
pub fn is_video_id(candidate: &str) -> bool {
    BARE_ID_RE.is_match(candidate)
}

/// Validate a bare video identifier without trying any URL shape
pub fn parse_video_id(candidate: &str) -> Result<VideoId, TranscriptError> {
    let candidate = candidate.trim();
    if is_video_id(candidate) {
        Ok(VideoId(candidate.to_string()))
    } else {
        Err(TranscriptError::InvalidUrlFormat(candidate.to_string()))
    }
}

/// Resolve a video reference (bare identifier or URL) into a [`VideoId`].
///
/// A bare identifier is returned as-is. Otherwise the reference is matched
/// against the watch, short link, embed and legacy `/v/` URL shapes in that
/// order; the first shape that matches wins.
pub fn resolve(reference: &str) -> Result<VideoId, TranscriptError> {
    let reference = reference.trim();

    if is_video_id(reference) {
        return Ok(VideoId(reference.to_string()));
    }

    for (shape, pattern) in URL_PATTERNS.iter() {
        if let Some(id) = pattern.captures(reference).and_then(|caps| caps.get(1)) {
            tracing::debug!("Resolved {} URL shape to video ID {}", shape, id.as_str());
            return Ok(VideoId(id.as_str().to_string()));
        }
    }

    Err(TranscriptError::InvalidUrlFormat(reference.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_all_url_shapes_yield_same_id() {
        let urls = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/v/dQw4w9WgXcQ",
        ];
        for url in urls {
            assert_eq!(resolve(url).unwrap().as_str(), ID, "url: {}", url);
        }
    }

    #[test]
    fn test_bare_id_passes_through() {
        assert_eq!(resolve(ID).unwrap().as_str(), ID);
        assert_eq!(resolve("  a-b_c-d_e-f  ").unwrap().as_str(), "a-b_c-d_e-f");
    }

    #[test]
    fn test_trailing_parameters_are_discarded() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap().as_str(),
            ID
        );
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ?si=abc#frag").unwrap().as_str(), ID);
        assert_eq!(
            resolve("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1").unwrap().as_str(),
            ID
        );
        assert_eq!(
            resolve("https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ").unwrap().as_str(),
            ID
        );
    }

    #[test]
    fn test_first_matching_shape_wins() {
        // Both the short link and the watch query match; watch is checked first
        assert_eq!(
            resolve("https://youtu.be/AAAAAAAAAAA/watch?v=BBBBBBBBBBB").unwrap().as_str(),
            "BBBBBBBBBBB"
        );
        assert_eq!(
            resolve("https://youtu.be/CCCCCCCCCCC?next=/embed/DDDDDDDDDDD").unwrap().as_str(),
            "CCCCCCCCCCC"
        );
        assert_eq!(
            resolve("https://www.youtube.com/v/EEEEEEEEEEE/embed/FFFFFFFFFFF").unwrap().as_str(),
            "FFFFFFFFFFF"
        );
    }

    #[test]
    fn test_invalid_references_fail() {
        let inputs = [
            "",
            "not a url",
            "dQw4w9WgXc",
            "dQw4w9WgXcQQ",
            "https://www.youtube.com/watch?v=short",
            "https://youtu.be/dQw4w9WgXcQQ",
            "https://example.com/video/dQw4w9WgXcQ",
            "https://www.youtube.com/watch#v=dQw4w9WgXcQ",
        ];
        for input in inputs {
            match resolve(input) {
                Err(TranscriptError::InvalidUrlFormat(msg)) => assert_eq!(msg, input.trim()),
                other => panic!("expected InvalidUrlFormat for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_parse_video_id_rejects_urls() {
        assert!(parse_video_id(ID).is_ok());
        assert!(matches!(
            parse_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Err(TranscriptError::InvalidUrlFormat(_))
        ));
    }
}
