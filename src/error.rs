use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            code: None,
            message: None,
        }
    }

    fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    ConfigError(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("NewsAPI error: {}", message.as_deref().unwrap_or("unknown error"))]
    UpstreamError {
        code: Option<String>,
        message: Option<String>,
    },

    #[error("Invalid response format")]
    InvalidResponseFormat,

    #[error("Failed to generate hot take: {0}")]
    GenerationError(String),

    #[error("Failed to fetch news: {0}")]
    FetchError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request processing timed out")]
    Timeout,

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::ConfigError(_)
            | AppError::UpstreamError { .. }
            | AppError::InvalidResponseFormat
            | AppError::GenerationError(_)
            | AppError::FetchError(_)
            | AppError::NetworkError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let summary = self.to_string();

        let body = match self {
            AppError::ConfigError(_)
            | AppError::ValidationError(_)
            | AppError::InvalidResponseFormat
            | AppError::Timeout
            | AppError::MethodNotAllowed => ErrorResponse::new(summary),
            AppError::UpstreamError { code, message } => ErrorResponse {
                error: "NewsAPI error".to_string(),
                details: None,
                code,
                message,
            },
            AppError::GenerationError(details) => {
                ErrorResponse::new("Failed to generate hot take").with_details(details)
            }
            AppError::FetchError(details) => {
                ErrorResponse::new("Failed to fetch news").with_details(details)
            }
            AppError::NetworkError(details) => {
                ErrorResponse::new("Network error").with_details(details)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
