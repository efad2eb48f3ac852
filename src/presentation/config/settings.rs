#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub transcription: TranscriptionSettings,
    pub analysis: AnalysisSettings,
    pub recommendations: RecommendationSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub issuer_url: String,
}

#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct RecommendationSettings {
    pub top_k: usize,
    pub menu_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}")]
    InvalidVar(&'static str),
}

fn required(name: &'static str) -> Result<String, SettingsError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SettingsError::MissingVar(name)),
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let port = optional("SERVER_PORT")
            .map(|p| p.parse().map_err(|_| SettingsError::InvalidVar("SERVER_PORT")))
            .transpose()?
            .unwrap_or(3000);

        let max_connections = optional("DATABASE_MAX_CONNECTIONS")
            .map(|v| {
                v.parse()
                    .map_err(|_| SettingsError::InvalidVar("DATABASE_MAX_CONNECTIONS"))
            })
            .transpose()?
            .unwrap_or(5);

        let top_k = optional("RECOMMENDATION_TOP_K")
            .map(|v| {
                v.parse()
                    .map_err(|_| SettingsError::InvalidVar("RECOMMENDATION_TOP_K"))
            })
            .transpose()?
            .unwrap_or(3);

        Ok(Self {
            server: ServerSettings {
                host: optional("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            database: DatabaseSettings {
                url: required("DATABASE_URL")?,
                max_connections,
            },
            auth: AuthSettings {
                issuer_url: required("AUTH_ISSUER_URL")?,
            },
            transcription: TranscriptionSettings {
                api_key: required("ELEVENLABS_API_KEY")?,
                base_url: optional("ELEVENLABS_BASE_URL"),
                model: optional("ELEVENLABS_MODEL").unwrap_or_else(|| "scribe_v2".to_string()),
            },
            analysis: AnalysisSettings {
                api_key: required("GEMINI_API_KEY")?,
                base_url: optional("GEMINI_BASE_URL"),
                model: optional("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            },
            recommendations: RecommendationSettings {
                top_k,
                menu_file: optional("MENU_FILE"),
            },
            logging: LoggingSettings {
                level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                enable_json: optional("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(false),
            },
        })
    }
}
