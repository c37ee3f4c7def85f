//! API error handling.
//!
//! Maps core errors onto HTTP status codes. Upstream and internal
//! failures are logged with their cause but reported to clients with a
//! generic message so provider details never leak over the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Generation or embedding backend failure. The cause is logged,
    /// not echoed to the client.
    Upstream(String),
    /// Storage or other internal failure. The cause is logged, not
    /// echoed to the client.
    Internal(String),
}

impl From<sous_core::Error> for ApiError {
    fn from(err: sous_core::Error) -> Self {
        use sous_core::Error;
        match err {
            Error::EmptyQuery | Error::InvalidInput(_) => ApiError::BadRequest(err.to_string()),
            Error::NotFound(_) | Error::RecipeNotFound(_) | Error::UserNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            Error::Generation(_) | Error::Embedding(_) => ApiError::Upstream(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(cause) => {
                error!(subsystem = "api", error = %cause, "upstream inference failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream inference service unavailable".to_string(),
                )
            }
            ApiError::Internal(cause) => {
                error!(subsystem = "api", error = %cause, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_core_error_status_mapping() {
        use sous_core::Error;
        let cases: Vec<(Error, StatusCode)> = vec![
            (Error::EmptyQuery, StatusCode::BAD_REQUEST),
            (Error::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (Error::RecipeNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (Error::UserNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (Error::Generation("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Embedding("x".into()), StatusCode::BAD_GATEWAY),
            (Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (Error::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(status_of(ApiError::from(err)), expected);
        }
    }

    #[test]
    fn test_upstream_cause_is_not_echoed() {
        let err = ApiError::Upstream("api key sk-secret rejected".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        // Body is built from the generic message only.
    }
}
