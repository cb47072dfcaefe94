use serde::{Deserialize, Serialize};

use crate::TranscriptError;

/// Language code preferred when the caller's language is not available
pub const FALLBACK_LANGUAGE: &str = "en";

/// A transcript language offered for a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLanguageOption {
    /// Language code as reported by YouTube (e.g. "en", "pt-BR")
    pub language_code: String,

    /// Human-readable language name
    pub language: String,

    /// Auto-generated by YouTube rather than provided by the creator
    pub is_generated: bool,

    /// YouTube can machine-translate this transcript
    pub is_translatable: bool,
}

impl TranscriptLanguageOption {
    pub fn new(language_code: impl Into<String>, language: impl Into<String>, is_generated: bool) -> Self {
        Self {
            language_code: language_code.into(),
            language: language.into(),
            is_generated,
            is_translatable: false,
        }
    }
}

/// Pick the transcript to fetch.
///
/// Priority: the requested language, then English, then the first option in
/// the order the source reported them. An empty request counts as no request.
pub fn select<'a>(
    video_id: &str,
    requested: Option<&str>,
    available: &'a [TranscriptLanguageOption],
) -> Result<&'a TranscriptLanguageOption, TranscriptError> {
    let first = available
        .first()
        .ok_or_else(|| TranscriptError::NoTranscriptAvailable(video_id.to_string()))?;

    let requested = requested.map(str::trim).filter(|code| !code.is_empty());

    if let Some(code) = requested {
        if let Some(option) = find_by_code(available, code) {
            return Ok(option);
        }
        tracing::info!("Requested language '{}' not available for {}", code, video_id);
    }

    if let Some(option) = find_by_code(available, FALLBACK_LANGUAGE) {
        return Ok(option);
    }

    tracing::info!("Using fallback language: {}", first.language_code);
    Ok(first)
}

fn find_by_code<'a>(
    available: &'a [TranscriptLanguageOption],
    code: &str,
) -> Option<&'a TranscriptLanguageOption> {
    available.iter().find(|option| option.language_code == code)
}
