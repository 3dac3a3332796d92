use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Chat API error: {0}")]
    Chat(#[from] ChatError),

    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Todo store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store at {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write store at {path}: {message}")]
    Write { path: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Chat-completions API errors
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Google Calendar API and OAuth errors
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Credentials file error: {message}")]
    Credentials { message: String },

    #[error("Token exchange failed: {message}")]
    TokenExchange { message: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Tool invocation errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    #[error("Invalid arguments for {tool_name}: {message}")]
    InvalidArguments { tool_name: String, message: String },

    /// Validation failure with a fixed, user-safe localized message.
    #[error("{message}")]
    Validation { message: String },

    /// Execution failure whose detail must not reach the model or user.
    #[error("Tool execution failed: {message}")]
    Execution { message: String },
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        ToolError::Execution {
            message: err.to_string(),
        }
    }
}

impl From<CalendarError> for ToolError {
    fn from(err: CalendarError) -> Self {
        ToolError::Execution {
            message: err.to_string(),
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for chat API operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Result type alias for calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Result type alias for tool invocations
pub type ToolResult<T> = Result<T, ToolError>;
