use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod youtube;

use crate::language::TranscriptLanguageOption;
use crate::resolver::VideoId;
use crate::TranscriptError;

/// One timed unit of transcript text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Spoken text
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }
}

/// Transcript as returned by a [`TranscriptSource`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTranscript {
    /// Segments in chronological order
    pub segments: Vec<TranscriptSegment>,

    /// The source's own payload, rendered verbatim for the `raw` format.
    /// Its shape depends on the source and carries no stability guarantee.
    pub raw: String,
}

/// Capability to list and fetch YouTube transcripts.
///
/// Implementations translate their own failures into [`TranscriptError`] and
/// must be safe to call from concurrent requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List the transcript languages available for a video, in source order
    async fn list_languages(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptLanguageOption>, TranscriptError>;

    /// Fetch the transcript of a video in the given language
    async fn fetch(
        &self,
        video_id: &VideoId,
        language_code: &str,
    ) -> Result<FetchedTranscript, TranscriptError>;

    /// Get the name of this source
    fn source_name(&self) -> &'static str;
}
