use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};

use crate::api::response;

pub const INVALID_URL_MESSAGE: &str = "Invalid URL format.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to fetch data: {0}")]
    FetchError(String),

    #[error("Summarization error: {0}")]
    SummarizationError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::FetchError(_)
            | AppError::SummarizationError(_)
            | AppError::Timeout(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to callers. Details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => INVALID_URL_MESSAGE,
            AppError::FetchError(_) => "Failed to extract content from the URL.",
            AppError::SummarizationError(_) => "Failed to generate summary.",
            AppError::Timeout(_) => "Request processing timed out.",
            AppError::ConfigError(_) => "Internal server error.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidInput(detail) => tracing::info!("Rejected request: {}", detail),
            other => tracing::error!("{}", other),
        }

        response::error(self.status(), self.public_message()).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
