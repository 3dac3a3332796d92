use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub store: StoreConfig,
    pub calendar: CalendarConfig,
    pub logging: LoggingConfig,
    pub agent: AgentConfig,
}

/// OpenAI-compatible chat API configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

/// Todo store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub todo_path: PathBuf,
}

/// Google Calendar configuration
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub credentials_path: PathBuf,
    pub token_path: PathBuf,
    pub api_base_url: String,
    pub auth_base_url: String,
    pub token_url: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Conversation loop configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// History cap, including the system turn.
    pub max_history: usize,
    /// Per-turn user input cap in characters.
    pub max_input_chars: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let openai = OpenAiConfig {
            api_key: env::var("OPENAI_API_KEY").map_err(|_| AppError::Config {
                message: "OPENAI_API_KEY is required".to_string(),
            })?,
            base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com".to_string()),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout_ms: env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30000),
        };

        let store = StoreConfig {
            todo_path: PathBuf::from(
                env::var("TODO_PATH").unwrap_or_else(|_| "./todos.json".to_string()),
            ),
        };

        let calendar = CalendarConfig {
            credentials_path: PathBuf::from(
                env::var("GOOGLE_CREDENTIALS_PATH")
                    .unwrap_or_else(|_| "./credentials.json".to_string()),
            ),
            token_path: PathBuf::from(
                env::var("GOOGLE_TOKEN_PATH").unwrap_or_else(|_| "./token.json".to_string()),
            ),
            api_base_url: env::var("GOOGLE_API_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com".to_string()),
            auth_base_url: env::var("GOOGLE_AUTH_BASE_URL")
                .unwrap_or_else(|_| "https://accounts.google.com".to_string()),
            token_url: env::var("GOOGLE_TOKEN_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let agent = AgentConfig {
            max_history: env::var("MAX_HISTORY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            max_input_chars: env::var("MAX_INPUT_CHARS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),
        };

        Ok(Config {
            openai,
            store,
            calendar,
            logging,
            agent,
        })
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_history: 50,
            max_input_chars: 1000,
        }
    }
}
