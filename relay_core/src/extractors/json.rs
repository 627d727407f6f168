//! JSON body extractor that tolerates missing or non-JSON bodies

use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Like `axum::Json`, but a request without a JSON body yields `T::default()`
/// instead of a rejection. Only a JSON body that fails to parse is refused.
pub struct LenientJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = is_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(JsonBodyRejection::Body)?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(LenientJson(T::default()));
        }

        serde_json::from_slice(&bytes)
            .map(LenientJson)
            .map_err(JsonBodyRejection::InvalidJson)
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

#[derive(Debug)]
pub enum JsonBodyRejection {
    Body(BytesRejection),
    InvalidJson(serde_json::Error),
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        match self {
            JsonBodyRejection::Body(rejection) => (
                rejection.status(),
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response(),
            JsonBodyRejection::InvalidJson(err) => {
                tracing::debug!(error = %err, "rejected malformed JSON body");
                AppError::BadRequest("Invalid JSON body".to_string()).into_response()
            }
        }
    }
}

impl std::fmt::Display for JsonBodyRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonBodyRejection::Body(rejection) => write!(f, "Failed to read body: {}", rejection),
            JsonBodyRejection::InvalidJson(err) => write!(f, "Invalid JSON: {}", err),
        }
    }
}

impl std::error::Error for JsonBodyRejection {}
