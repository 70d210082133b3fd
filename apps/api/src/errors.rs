use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::analysis::extractor::ExtractError;
use crate::llm_client::LlmError;

pub const MISSING_API_KEY_MESSAGE: &str =
    "ANTHROPIC_API_KEY not set. Create a .env file with your API key.";
pub const INVALID_PROFILE_MESSAGE: &str =
    "Invalid profile text. Please upload a valid LinkedIn PDF.";
const INVALID_ACCESS_CODE_MESSAGE: &str = "Invalid access code.";
const UPSTREAM_AUTH_MESSAGE: &str = "API authentication failed. Check your ANTHROPIC_API_KEY.";
const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please wait a moment.";
const UPSTREAM_FAILURE_MESSAGE: &str = "Analysis service error. Please try again.";
const UPSTREAM_TIMEOUT_MESSAGE: &str = "Analysis service timed out. Please try again.";
const PARSE_FAILURE_MESSAGE: &str = "Could not parse analysis results. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                INVALID_ACCESS_CODE_MESSAGE.to_string(),
            ),
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::MalformedBody(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Server error: {msg}"),
            ),
            AppError::Llm(e) => llm_status_and_message(e),
            AppError::Extract(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                PARSE_FAILURE_MESSAGE.to_string(),
            ),
        }
    }
}

/// 429 is passed through; an upstream 401 is our misconfiguration, not the caller's.
fn llm_status_and_message(e: &LlmError) -> (StatusCode, String) {
    match (e, e.status()) {
        (_, Some(401)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            UPSTREAM_AUTH_MESSAGE.to_string(),
        ),
        (_, Some(429)) => (
            StatusCode::TOO_MANY_REQUESTS,
            RATE_LIMITED_MESSAGE.to_string(),
        ),
        (LlmError::Timeout { .. }, _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            UPSTREAM_TIMEOUT_MESSAGE.to_string(),
        ),
        (LlmError::Transport(err), _) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Server error: {err}"),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            UPSTREAM_FAILURE_MESSAGE.to_string(),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!("{self}");
        } else if status != StatusCode::NOT_FOUND {
            tracing::warn!("{self}");
        }

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Parses a JSON request body. Any failure is a server error, never a 4xx.
///
/// Takes the extractor result as-is so that a body axum refuses to buffer
/// (over the size limit, aborted mid-stream) gets the same JSON error reply.
pub fn parse_json_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> Result<T, AppError> {
    let body = body.map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;
    serde_json::from_slice(&body).map_err(|e| AppError::MalformedBody(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status_of(err: AppError) -> (u16, String) {
        let (status, message) = err.status_and_message();
        (status.as_u16(), message)
    }

    fn api_error(status: u16) -> AppError {
        AppError::Llm(LlmError::Api {
            status,
            message: "upstream said no".to_string(),
        })
    }

    #[test]
    fn test_rate_limit_passes_through_as_429() {
        let (status, message) = status_of(api_error(429));
        assert_eq!(status, 429);
        assert_eq!(message, RATE_LIMITED_MESSAGE);
    }

    #[test]
    fn test_upstream_401_is_a_configuration_500() {
        let (status, message) = status_of(api_error(401));
        assert_eq!(status, 500);
        assert!(message.contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_other_upstream_statuses_collapse_to_generic_500() {
        for code in [400, 403, 500, 529] {
            let (status, message) = status_of(api_error(code));
            assert_eq!(status, 500);
            assert_eq!(message, UPSTREAM_FAILURE_MESSAGE);
        }
    }

    #[test]
    fn test_rate_limit_message_differs_from_500_messages() {
        let (_, rate_limited) = status_of(api_error(429));
        for other in [api_error(401), api_error(503)] {
            assert_ne!(status_of(other).1, rate_limited);
        }
    }

    #[test]
    fn test_timeout_has_its_own_message() {
        let (status, message) = status_of(AppError::Llm(LlmError::Timeout {
            after: Duration::from_secs(60),
        }));
        assert_eq!(status, 500);
        assert_eq!(message, UPSTREAM_TIMEOUT_MESSAGE);
    }

    #[test]
    fn test_extract_error_uses_generic_parse_message() {
        let (status, message) = status_of(AppError::Extract(ExtractError::NoJsonObject));
        assert_eq!(status, 500);
        assert_eq!(message, PARSE_FAILURE_MESSAGE);
    }

    #[test]
    fn test_validation_and_auth_statuses() {
        assert_eq!(
            status_of(AppError::Validation(INVALID_PROFILE_MESSAGE.to_string())).0,
            400
        );
        assert_eq!(
            status_of(AppError::Unauthorized),
            (401, INVALID_ACCESS_CODE_MESSAGE.to_string())
        );
        assert_eq!(status_of(AppError::NotFound).0, 404);
    }

    #[test]
    fn test_malformed_body_is_500_with_detail() {
        let err =
            parse_json_body::<serde_json::Value>(Ok(Bytes::from_static(b"{not json"))).unwrap_err();
        let (status, message) = status_of(err);
        assert_eq!(status, 500);
        assert!(message.starts_with("Server error: "));
    }
}
