mod auth;
mod health;
mod preferences;
mod recommendations;
mod voice;

pub use auth::{require_user, ErrorResponse};
pub use health::health_handler;
pub use preferences::{
    create_preference_handler, delete_preference_handler, export_preferences_handler,
    list_preferences_handler, update_preference_handler,
};
pub use recommendations::recommendations_handler;
pub use voice::analyze_voice_handler;
