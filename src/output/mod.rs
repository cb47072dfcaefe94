use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::resolver::VideoId;
use crate::source::FetchedTranscript;
use crate::TranscriptError;

pub mod formatters;

pub use formatters::*;

/// Output formats a transcript can be rendered in
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `[MM:SS] text` lines
    #[default]
    Text,
    /// Structured segments with metadata
    Json,
    /// Source payload, unprocessed
    Raw,
}

impl FromStr for OutputFormat {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(TranscriptError::InvalidFormatType(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Raw => write!(f, "raw"),
        }
    }
}

/// A transcript rendered in one of the [`OutputFormat`]s
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedResult {
    Text(String),
    Json(serde_json::Value),
    Raw(String),
}

impl FormattedResult {
    /// Format this result for the caller
    pub fn render(&self) -> String {
        match self {
            FormattedResult::Text(text) | FormattedResult::Raw(text) => text.clone(),
            // Serializing a Value into a String cannot fail
            FormattedResult::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Render a fetched transcript in the requested format
pub fn format(
    transcript: &FetchedTranscript,
    format: OutputFormat,
    video_id: &VideoId,
    language_code: &str,
) -> FormattedResult {
    match format {
        OutputFormat::Text => FormattedResult::Text(format_as_text(&transcript.segments)),
        OutputFormat::Json => {
            FormattedResult::Json(format_as_json(&transcript.segments, video_id, language_code))
        }
        OutputFormat::Raw => FormattedResult::Raw(transcript.raw.clone()),
    }
}
