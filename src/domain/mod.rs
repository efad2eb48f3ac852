mod insight;
mod menu_item;
mod preference;
mod transcription;
mod user_id;

pub use insight::{Emotion, Insight, Sentiment};
pub use menu_item::MenuItem;
pub use preference::{Preference, PreferenceCandidate, PreferenceId, PreferenceKind};
pub use transcription::TranscriptionResult;
pub use user_id::UserId;
