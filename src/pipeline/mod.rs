use serde::Serialize;
use std::sync::Arc;

use crate::config::TranscriptDefaults;
use crate::language::{self, TranscriptLanguageOption};
use crate::output::{self, FormattedResult, OutputFormat};
use crate::resolver::{self, VideoId};
use crate::source::TranscriptSource;
use crate::TranscriptError;

/// Languages available for a resolved video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageListing {
    pub video_id: VideoId,
    pub languages: Vec<TranscriptLanguageOption>,
}

/// Request pipeline behind every exposed operation.
///
/// Holds no per-request state, so one instance serves concurrent callers.
pub struct TranscriptPipeline {
    source: Arc<dyn TranscriptSource>,
    defaults: TranscriptDefaults,
}

impl TranscriptPipeline {
    pub fn new(source: Arc<dyn TranscriptSource>, defaults: TranscriptDefaults) -> Self {
        Self { source, defaults }
    }

    /// Fetch the transcript of a video given by URL (or bare ID)
    pub async fn get_transcript_from_url(
        &self,
        url: &str,
        language: Option<&str>,
        format_type: Option<&str>,
    ) -> Result<FormattedResult, TranscriptError> {
        tracing::info!("Getting transcript for URL: {}", url);
        let video_id = resolver::resolve(url)?;
        self.transcript(video_id, language, format_type).await
    }

    /// Fetch the transcript of a video given by its 11-character ID
    pub async fn get_transcript_from_id(
        &self,
        video_id: &str,
        language: Option<&str>,
        format_type: Option<&str>,
    ) -> Result<FormattedResult, TranscriptError> {
        tracing::info!("Getting transcript for video ID: {}", video_id);
        let video_id = resolver::parse_video_id(video_id)?;
        self.transcript(video_id, language, format_type).await
    }

    /// List the transcript languages of a video given by URL or ID
    pub async fn list_available_transcripts(
        &self,
        video_url_or_id: &str,
    ) -> Result<LanguageListing, TranscriptError> {
        tracing::info!("Listing transcripts for: {}", video_url_or_id);
        let video_id = resolver::resolve(video_url_or_id)?;
        let languages = self.source.list_languages(&video_id).await?;

        tracing::debug!("Found {} transcript languages for {}", languages.len(), video_id);
        Ok(LanguageListing {
            video_id,
            languages,
        })
    }

    async fn transcript(
        &self,
        video_id: VideoId,
        language: Option<&str>,
        format_type: Option<&str>,
    ) -> Result<FormattedResult, TranscriptError> {
        let format = match format_type {
            Some(format_type) => format_type.parse::<OutputFormat>()?,
            None => self.defaults.default_format,
        };
        let requested = language.or(self.defaults.default_language.as_deref());

        let available = self.source.list_languages(&video_id).await?;
        let selected = language::select(video_id.as_str(), requested, &available)?;
        tracing::info!(
            "Selected {} transcript ({}) for {}",
            selected.language_code,
            if selected.is_generated { "auto-generated" } else { "manual" },
            video_id
        );

        let transcript = self.source.fetch(&video_id, &selected.language_code).await?;
        tracing::info!(
            "Fetched {} transcript segments from {}",
            transcript.segments.len(),
            self.source.source_name()
        );

        Ok(output::format(&transcript, format, &video_id, &selected.language_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FetchedTranscript, MockTranscriptSource, TranscriptSegment};

    const ID: &str = "dQw4w9WgXcQ";

    fn languages(codes: &[&str]) -> Vec<TranscriptLanguageOption> {
        codes
            .iter()
            .map(|code| TranscriptLanguageOption::new(*code, code.to_uppercase(), false))
            .collect()
    }

    fn transcript() -> FetchedTranscript {
        FetchedTranscript {
            segments: vec![
                TranscriptSegment::new(1.0, 2.0, "Never gonna give you up"),
                TranscriptSegment::new(65.0, 2.0, "hello"),
            ],
            raw: "raw payload".to_string(),
        }
    }

    fn pipeline(source: MockTranscriptSource) -> TranscriptPipeline {
        TranscriptPipeline::new(Arc::new(source), TranscriptDefaults::default())
    }

    fn source_with(codes: &'static [&'static str], expected_language: &'static str) -> MockTranscriptSource {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_languages()
            .times(1)
            .returning(move |_| Ok(languages(codes)));
        source
            .expect_fetch()
            .withf(move |id, code| id.as_str() == ID && code == expected_language)
            .times(1)
            .returning(|_, _| Ok(transcript()));
        source.expect_source_name().return_const("mock");
        source
    }

    #[tokio::test]
    async fn test_url_to_text_transcript() {
        let pipeline = pipeline(source_with(&["es", "en", "fr"], "en"));

        let result = pipeline
            .get_transcript_from_url("https://youtu.be/dQw4w9WgXcQ", None, Some("text"))
            .await
            .unwrap();

        assert_eq!(
            result,
            FormattedResult::Text("[00:01] Never gonna give you up\n[01:05] hello".to_string())
        );
    }

    #[tokio::test]
    async fn test_requested_language_and_json() {
        let pipeline = pipeline(source_with(&["es", "en", "fr"], "fr"));

        let result = pipeline
            .get_transcript_from_id(ID, Some("fr"), Some("json"))
            .await
            .unwrap();

        let FormattedResult::Json(value) = result else {
            panic!("expected json result");
        };
        assert_eq!(value["language_code"], "fr");
        assert_eq!(value["video_id"], ID);
        assert_eq!(value["segment_count"], 2);
    }

    #[tokio::test]
    async fn test_first_available_fallback_and_raw() {
        let pipeline = pipeline(source_with(&["fr"], "fr"));

        let result = pipeline
            .get_transcript_from_id(ID, Some("en"), Some("raw"))
            .await
            .unwrap();

        assert_eq!(result, FormattedResult::Raw("raw payload".to_string()));
    }

    #[tokio::test]
    async fn test_configured_defaults_apply() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_languages()
            .returning(|_| Ok(languages(&["es", "en"])));
        source
            .expect_fetch()
            .withf(|_, code| code == "es")
            .returning(|_, _| Ok(transcript()));
        source.expect_source_name().return_const("mock");

        let defaults = TranscriptDefaults {
            default_language: Some("es".to_string()),
            default_format: OutputFormat::Raw,
        };
        let pipeline = TranscriptPipeline::new(Arc::new(source), defaults);

        let result = pipeline.get_transcript_from_id(ID, None, None).await.unwrap();
        assert_eq!(result, FormattedResult::Raw("raw payload".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_url_skips_source() {
        let pipeline = pipeline(MockTranscriptSource::new());

        let err = pipeline
            .get_transcript_from_url("https://example.com/nothing", None, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "InvalidURLFormat");
    }

    #[tokio::test]
    async fn test_id_operation_rejects_urls() {
        let pipeline = pipeline(MockTranscriptSource::new());

        let err = pipeline
            .get_transcript_from_id("https://youtu.be/dQw4w9WgXcQ", None, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "InvalidURLFormat");
    }

    #[tokio::test]
    async fn test_invalid_format_type_fails_before_network() {
        let pipeline = pipeline(MockTranscriptSource::new());

        let err = pipeline
            .get_transcript_from_id(ID, None, Some("xml"))
            .await
            .unwrap_err();

        assert_eq!(err, TranscriptError::InvalidFormatType("xml".to_string()));
    }

    #[tokio::test]
    async fn test_no_languages_is_no_transcript_available() {
        let mut source = MockTranscriptSource::new();
        source.expect_list_languages().returning(|_| Ok(Vec::new()));
        let pipeline = pipeline(source);

        let err = pipeline.get_transcript_from_id(ID, None, None).await.unwrap_err();

        assert_eq!(err, TranscriptError::NoTranscriptAvailable(ID.to_string()));
    }

    #[tokio::test]
    async fn test_listing_failure_is_propagated() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_languages()
            .returning(|id| Err(TranscriptError::TranscriptsDisabled(id.to_string())));
        let pipeline = pipeline(source);

        let err = pipeline
            .get_transcript_from_url("https://youtu.be/dQw4w9WgXcQ", None, Some("text"))
            .await
            .unwrap_err();

        assert_eq!(err, TranscriptError::TranscriptsDisabled(ID.to_string()));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_propagated() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_languages()
            .returning(|_| Ok(languages(&["en"])));
        source
            .expect_fetch()
            .returning(|id, _| Err(TranscriptError::TooManyRequests(id.to_string())));
        let pipeline = pipeline(source);

        let err = pipeline.get_transcript_from_id(ID, None, None).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(err.kind(), "TooManyRequests");
    }

    #[tokio::test]
    async fn test_list_available_transcripts() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_languages()
            .withf(|id| id.as_str() == ID)
            .returning(|_| Ok(languages(&["de", "en"])));
        let pipeline = pipeline(source);

        let listing = pipeline
            .list_available_transcripts("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .await
            .unwrap();

        assert_eq!(listing.video_id.as_str(), ID);
        let codes: Vec<_> = listing.languages.iter().map(|l| l.language_code.as_str()).collect();
        assert_eq!(codes, ["de", "en"]);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_list_languages()
            .times(2)
            .returning(|_| Ok(languages(&["en"])));
        source
            .expect_fetch()
            .times(2)
            .returning(|_, _| Ok(transcript()));
        source.expect_source_name().return_const("mock");
        let pipeline = pipeline(source);

        let first = pipeline.get_transcript_from_id(ID, None, Some("json")).await.unwrap();
        let second = pipeline.get_transcript_from_id(ID, None, Some("json")).await.unwrap();

        assert_eq!(first.render(), second.render());
    }
}
