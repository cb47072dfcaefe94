//! YouTube Transcript MCP - serve YouTube video transcripts to tool-calling LLM clients
//!
//! This library resolves YouTube URLs and video identifiers, picks a transcript language,
//! fetches the transcript through [`source::TranscriptSource`] and renders it as timestamped
//! text, a structured JSON object or the raw collaborator payload. The [`server`] module
//! exposes the pipeline over the Model Context Protocol on stdio or HTTP.

pub mod cli;
pub mod config;
pub mod language;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod server;
pub mod source;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use language::TranscriptLanguageOption;
pub use output::{FormattedResult, OutputFormat};
pub use pipeline::{LanguageListing, TranscriptPipeline};
pub use resolver::VideoId;
pub use source::{FetchedTranscript, TranscriptSegment, TranscriptSource};

/// Result type used by the binary and the transport plumbing
pub type Result<T> = anyhow::Result<T>;

/// Classified failures of a transcript request.
///
/// Every pipeline stage reports exactly one of these; callers see them through
/// [`TranscriptError::caller_message`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Could not extract a valid YouTube video ID from: {0}")]
    InvalidUrlFormat(String),

    #[error("Invalid format type '{0}'. Expected one of: text, json, raw")]
    InvalidFormatType(String),

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("Video {0} is unavailable or does not exist")]
    VideoUnavailable(String),

    #[error("No transcript found for video {video_id} in language '{language}'")]
    NoTranscriptFound { video_id: String, language: String },

    #[error("No transcripts available for video {0}")]
    NoTranscriptAvailable(String),

    #[error("Too many requests to YouTube for video {0}. Please try again later")]
    TooManyRequests(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl TranscriptError {
    /// Stable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TranscriptError::InvalidUrlFormat(_) => "InvalidURLFormat",
            TranscriptError::InvalidFormatType(_) => "InvalidFormatType",
            TranscriptError::TranscriptsDisabled(_) => "TranscriptsDisabled",
            TranscriptError::VideoUnavailable(_) => "VideoUnavailable",
            TranscriptError::NoTranscriptFound { .. } => "NoTranscriptFound",
            TranscriptError::NoTranscriptAvailable(_) => "NoTranscriptAvailable",
            TranscriptError::TooManyRequests(_) => "TooManyRequests",
            TranscriptError::Unknown(_) => "UnknownError",
        }
    }

    /// Whether the same request may succeed later without changing its input
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TranscriptError::TooManyRequests(_) | TranscriptError::Unknown(_)
        )
    }

    /// Message handed back to the tool caller
    pub fn caller_message(&self) -> String {
        format!("Error [{}]: {}", self.kind(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_message_carries_kind() {
        let err = TranscriptError::InvalidFormatType("xml".to_string());
        assert_eq!(
            err.caller_message(),
            "Error [InvalidFormatType]: Invalid format type 'xml'. Expected one of: text, json, raw"
        );
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(TranscriptError::TooManyRequests("abc".into()).is_retryable());
        assert!(TranscriptError::Unknown("boom".into()).is_retryable());
        assert!(!TranscriptError::InvalidUrlFormat("x".into()).is_retryable());
        assert!(!TranscriptError::VideoUnavailable("abc".into()).is_retryable());
    }
}
