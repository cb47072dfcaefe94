use async_trait::async_trait;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use super::{FetchedTranscript, TranscriptSegment, TranscriptSource};
use crate::language::TranscriptLanguageOption;
use crate::resolver::VideoId;
use crate::{Result, TranscriptError};

/// Transcript source backed by the `yt-transcript-rs` client
pub struct YoutubeTranscriptSource {
    api: YouTubeTranscriptApi,
    preserve_formatting: bool,
}

impl YoutubeTranscriptSource {
    pub fn new(preserve_formatting: bool) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| anyhow::anyhow!("Failed to create YouTube transcript client: {}", e))?;

        Ok(Self {
            api,
            preserve_formatting,
        })
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptSource {
    async fn list_languages(
        &self,
        video_id: &VideoId,
    ) -> std::result::Result<Vec<TranscriptLanguageOption>, TranscriptError> {
        tracing::debug!("Listing transcripts for: {}", video_id);

        let transcript_list = self
            .api
            .list_transcripts(video_id.as_str())
            .await
            .map_err(|e| classify(e, video_id, None))?;

        let options = transcript_list
            .transcripts()
            .map(|transcript| TranscriptLanguageOption {
                language_code: transcript.language_code.clone(),
                language: transcript.language.clone(),
                is_generated: transcript.is_generated,
                is_translatable: transcript.is_translatable(),
            })
            .collect();

        Ok(options)
    }

    async fn fetch(
        &self,
        video_id: &VideoId,
        language_code: &str,
    ) -> std::result::Result<FetchedTranscript, TranscriptError> {
        tracing::debug!("Fetching {} transcript for: {}", language_code, video_id);

        let fetched = self
            .api
            .fetch_transcript(video_id.as_str(), &[language_code], self.preserve_formatting)
            .await
            .map_err(|e| classify(e, video_id, Some(language_code)))?;

        let segments = fetched
            .snippets
            .iter()
            .map(|snippet| TranscriptSegment::new(snippet.start, snippet.duration, snippet.text.clone()))
            .collect();

        Ok(FetchedTranscript {
            segments,
            raw: format!("{:#?}", fetched),
        })
    }

    fn source_name(&self) -> &'static str {
        "YouTube"
    }
}

/// Map a `yt-transcript-rs` failure onto the request error taxonomy
fn classify(
    error: CouldNotRetrieveTranscript,
    video_id: &VideoId,
    language_code: Option<&str>,
) -> TranscriptError {
    let video_id = video_id.to_string();

    match &error.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => {
            TranscriptError::TranscriptsDisabled(video_id)
        }
        // Private, login-gated, age-restricted and malformed IDs are all unreachable
        Some(CouldNotRetrieveTranscriptReason::VideoUnavailable)
        | Some(CouldNotRetrieveTranscriptReason::VideoUnplayable { .. })
        | Some(CouldNotRetrieveTranscriptReason::AgeRestricted)
        | Some(CouldNotRetrieveTranscriptReason::InvalidVideoId) => {
            TranscriptError::VideoUnavailable(video_id)
        }
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
            TranscriptError::NoTranscriptFound {
                video_id,
                language: language_code.unwrap_or_default().to_string(),
            }
        }
        Some(CouldNotRetrieveTranscriptReason::IpBlocked { .. })
        | Some(CouldNotRetrieveTranscriptReason::RequestBlocked { .. }) => {
            tracing::warn!("YouTube blocked the request for {}", video_id);
            TranscriptError::TooManyRequests(video_id)
        }
        _ => {
            tracing::warn!("Unclassified transcript failure for {}: {}", video_id, error);
            TranscriptError::Unknown(error.to_string())
        }
    }
}
