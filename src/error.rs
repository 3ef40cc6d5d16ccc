//! Error types for KeepGoing.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Database-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),
}

/// Errors from the external AI provider.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("OPENAI_API_KEY not set")]
    MissingApiKey,

    #[error("OpenAI request failed: {0}")]
    Request(String),

    #[error("Invalid response from OpenAI: {0}")]
    InvalidResponse(String),
}

/// Boundary error type: every handler failure maps to exactly one HTTP
/// status plus a short message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(#[from] UpstreamError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(
            ApiError::Validation("title is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound { entity: "routine", id: 7 }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("already completed today".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Upstream(UpstreamError::MissingApiKey).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = ApiError::NotFound { entity: "routine", id: 42 };
        assert_eq!(err.to_string(), "routine 42 not found");
    }
}
