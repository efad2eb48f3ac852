pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

pub const ALLOWED_AUDIO_TYPES: [&str; 8] = [
    "audio/m4a",
    "audio/mp3",
    "audio/mp4",
    "audio/mpeg",
    "audio/ogg",
    "audio/wav",
    "audio/webm",
    "audio/x-m4a",
];

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("missing Content-Type")]
    MissingContentType,
    #[error("unsupported audio format: {given}. Allowed: {allowed}")]
    UnsupportedFormat { given: String, allowed: String },
    #[error("audio file is empty")]
    EmptyAudio,
    #[error("audio file too large (max {max_mb} MB)")]
    TooLarge { max_mb: usize },
}

/// Checks the declared content type and size of an audio upload before any
/// external call is made. Pure function of its inputs.
pub fn validate_audio(content_type: Option<&str>, byte_length: usize) -> Result<(), ValidationError> {
    let content_type = match content_type {
        Some(ct) if !ct.trim().is_empty() => ct,
        _ => return Err(ValidationError::MissingContentType),
    };

    // Parameters such as ";codecs=opus" do not affect acceptance.
    let base_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    if !ALLOWED_AUDIO_TYPES.contains(&base_type.as_str()) {
        return Err(ValidationError::UnsupportedFormat {
            given: content_type.to_string(),
            allowed: ALLOWED_AUDIO_TYPES.join(", "),
        });
    }

    if byte_length == 0 {
        return Err(ValidationError::EmptyAudio);
    }
    if byte_length > MAX_AUDIO_BYTES {
        return Err(ValidationError::TooLarge {
            max_mb: MAX_AUDIO_BYTES / (1024 * 1024),
        });
    }

    Ok(())
}
