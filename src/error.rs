use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Groq client is not initialized. Check API key.")]
    ConnectionError,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("LLM request failed: {0}")]
    LlmError(String),

    #[error("Unexpected response shape from LLM: {0}")]
    ParseError(String),

    #[error("Failed to write call log: {0}")]
    LogError(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConnectionError => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ConfigError(_)
            | AppError::LlmError(_)
            | AppError::ParseError(_)
            | AppError::LogError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::LlmError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
