/// Output of the speech-to-text stage. Consumed immediately by the voice
/// pipeline, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub text: String,
    pub language_code: Option<String>,
}
