mod settings;

pub use settings::{
    AnalysisSettings, AuthSettings, DatabaseSettings, LoggingSettings, RecommendationSettings,
    ServerSettings, Settings, SettingsError, TranscriptionSettings,
};
