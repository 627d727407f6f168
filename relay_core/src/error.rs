//! Application error types and handling

use crate::clients::UpstreamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    /// A credential the relay needs is not configured. The message is shown to the client.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An outbound call failed. Only `public` reaches the client.
    #[error("{public}: {source}")]
    Upstream {
        public: String,
        #[source]
        source: UpstreamError,
    },

    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(public: impl Into<String>, source: UpstreamError) -> Self {
        AppError::Upstream {
            public: public.into(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            AppError::Configuration(_) | AppError::Upstream { .. } | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::BadRequest(msg) => msg,
            AppError::NotFound => "Not found".to_string(),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                msg
            }
            AppError::Upstream { public, source } => {
                tracing::error!(error = %source, "{}", public);
                public
            }
            AppError::OriginNotAllowed(origin) => {
                tracing::warn!(origin = %origin, "rejected request from disallowed origin");
                "Not allowed by CORS".to_string()
            }
            AppError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_leaked() {
        let error = AppError::upstream(
            "Failed to fetch quote",
            UpstreamError::Decode("secret upstream detail".to_string()),
        );
        assert!(error.to_string().contains("secret upstream detail"));

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body, json!({ "error": "Failed to fetch quote" }));
    }

    #[tokio::test]
    async fn test_configuration_error_message_is_shown() {
        let response = AppError::Configuration("API Key missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": "API Key missing" }));
    }

    #[tokio::test]
    async fn test_bad_request_keeps_message() {
        let response = AppError::BadRequest("Invalid JSON body".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Invalid JSON body" }));
    }

    #[tokio::test]
    async fn test_origin_rejection_is_forbidden() {
        let response = AppError::OriginNotAllowed("https://evil.test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await, json!({ "error": "Not allowed by CORS" }));
    }
}
