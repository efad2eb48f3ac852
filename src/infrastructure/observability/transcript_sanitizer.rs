const MAX_VISIBLE_CHARS: usize = 100;

/// Shortens transcript text for safe, readable log output. Transcripts can
/// be long and may carry personal detail; logs only ever see a prefix.
pub fn sanitize_transcript(transcript: &str) -> String {
    let trimmed = transcript.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    if total_chars > MAX_VISIBLE_CHARS {
        let prefix: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", prefix, total_chars)
    } else {
        trimmed.to_string()
    }
}
