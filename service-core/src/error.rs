use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(anyhow::Error),

    /// The store could not be reached, or a statement ran past its deadline.
    #[error("Connection error: {0}")]
    ConnectionError(anyhow::Error),

    #[error("Database error: {0}")]
    DatabaseError(anyhow::Error),

    #[error("Integrity error: {0}")]
    IntegrityError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(anyhow::anyhow!(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(anyhow::anyhow!(msg.into()))
    }

    /// Connection failures cannot be absorbed by partial results.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, AppError::ConnectionError(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            success: bool,
            error: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<String>,
        }

        // Messages are built by this workspace; raw driver errors only go to the logs.
        let (status, error_message, details) = match self {
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string(), None),
            AppError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string(), None),
            AppError::ConnectionError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database unavailable".to_string(),
                Some(err.to_string()),
            ),
            AppError::DatabaseError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
                Some(err.to_string()),
            ),
            AppError::IntegrityError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Integrity constraint violated".to_string(),
                Some(err.to_string()),
            ),
            AppError::InternalError(err) => {
                let details = err
                    .chain()
                    .nth(1)
                    .map(|cause| cause.to_string());
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), details)
            }
            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable".to_string(),
                None,
            ),
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Configuration error".to_string(),
                Some(err.to_string()),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: error_message,
                details,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bad_request_maps_to_400() {
        let (status, body) = render(AppError::bad_request("id must be numeric")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "id must be numeric");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn connection_error_hides_driver_text() {
        let err = AppError::ConnectionError(anyhow::anyhow!("no database candidate reachable"));
        assert!(err.is_connection_error());

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Database unavailable");
        assert_eq!(body["details"], "no database candidate reachable");
    }

    #[tokio::test]
    async fn internal_error_splits_context_and_cause() {
        let err = AppError::InternalError(
            anyhow::anyhow!("sales_summary failed").context("Failed to compute sales statistics"),
        );
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to compute sales statistics");
        assert_eq!(body["details"], "sales_summary failed");
    }
}
