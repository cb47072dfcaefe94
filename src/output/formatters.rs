use serde_json::json;

use crate::pipeline::LanguageListing;
use crate::resolver::VideoId;
use crate::source::TranscriptSegment;

/// Format seconds as MM:SS, truncated to whole seconds. Minutes keep growing
/// past 59 instead of rolling over into an hour field.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format segments as `[MM:SS] text` lines
pub fn format_as_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| format!("[{}] {}", format_timestamp(segment.start), segment.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format segments as a JSON object with metadata
pub fn format_as_json(
    segments: &[TranscriptSegment],
    video_id: &VideoId,
    language_code: &str,
) -> serde_json::Value {
    json!({
        "video_id": video_id,
        "language_code": language_code,
        "segment_count": segments.len(),
        "segments": segments,
    })
}

/// Format the languages available for a video as a numbered list
pub fn render_language_listing(listing: &LanguageListing) -> String {
    if listing.languages.is_empty() {
        return format!("No transcripts available for video {}", listing.video_id);
    }

    let mut output = format!("Available transcripts for video {}:\n", listing.video_id);
    for (i, option) in listing.languages.iter().enumerate() {
        output.push_str(&format!(
            "\n{}. {} ({})\n   Generated: {}\n   Translatable: {}\n",
            i + 1,
            option.language,
            option.language_code,
            yes_no(option.is_generated),
            yes_no(option.is_translatable),
        ));
    }

    output
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
