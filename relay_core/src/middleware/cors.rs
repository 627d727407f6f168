//! Single-origin CORS gate and response headers

use crate::{config::CorsConfig, error::AppError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer as TowerCorsLayer};

/// A request may proceed when it carries no `Origin` (same-origin or
/// non-browser client) or exactly the allow-listed origin.
pub fn origin_allowed(origin: Option<&HeaderValue>, allowed: &str) -> bool {
    match origin {
        None => true,
        Some(value) => value.to_str().map(|o| o == allowed).unwrap_or(false),
    }
}

/// Rejects disallowed origins before routing, preflights included.
pub async fn origin_gate(
    State(allowed): State<Arc<str>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let origin = request.headers().get(header::ORIGIN);

    if !origin_allowed(origin, &allowed) {
        let shown = origin
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();
        return Err(AppError::OriginNotAllowed(shown));
    }

    Ok(next.run(request).await)
}

/// CORS response headers for the allow-listed origin.
pub fn cors_layer(config: &CorsConfig) -> TowerCorsLayer {
    let layer = TowerCorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([HeaderName::from_static("content-type")])
        .max_age(std::time::Duration::from_secs(3600));

    match HeaderValue::from_str(&config.allowed_origin) {
        Ok(origin) => layer.allow_origin(AllowOrigin::exact(origin)),
        Err(err) => {
            tracing::warn!(
                origin = %config.allowed_origin,
                error = %err,
                "allowed origin is not a valid header value, no CORS headers will be sent"
            );
            layer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::post,
        Router,
    };
    use tower::ServiceExt;

    const ALLOWED: &str = "https://keiner-alvarado-quintero.top";

    fn app() -> Router {
        let config = CorsConfig {
            allowed_origin: ALLOWED.to_string(),
        };
        Router::new()
            .route("/ping", post(|| async { "pong" }))
            .layer(cors_layer(&config))
            .layer(middleware::from_fn_with_state(Arc::<str>::from(ALLOWED), origin_gate))
    }

    fn request(method: &str, origin: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri("/ping");
        if let Some(origin) = origin {
            builder = builder.header("origin", origin);
        }
        if method == "OPTIONS" {
            builder = builder
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type");
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_origin_predicate() {
        assert!(origin_allowed(None, ALLOWED));
        assert!(origin_allowed(Some(&HeaderValue::from_static(ALLOWED)), ALLOWED));
        assert!(!origin_allowed(Some(&HeaderValue::from_static("https://evil.test")), ALLOWED));
        assert!(!origin_allowed(
            Some(&HeaderValue::from_static("https://keiner-alvarado-quintero.top/")),
            ALLOWED
        ));
        assert!(!origin_allowed(
            Some(&HeaderValue::from_static("HTTPS://KEINER-ALVARADO-QUINTERO.TOP")),
            ALLOWED
        ));
        assert!(!origin_allowed(Some(&HeaderValue::from_bytes(b"\xff").unwrap()), ALLOWED));
    }

    #[tokio::test]
    async fn test_request_without_origin_passes() {
        let response = app().oneshot(request("POST", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_allowed_origin_gets_cors_headers() {
        let response = app().oneshot(request("POST", Some(ALLOWED))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            ALLOWED
        );
    }

    #[tokio::test]
    async fn test_other_origin_is_rejected() {
        let response = app()
            .oneshot(request("POST", Some("https://evil.test")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_preflight() {
        let response = app().oneshot(request("OPTIONS", Some(ALLOWED))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            ALLOWED
        );

        let response = app()
            .oneshot(request("OPTIONS", Some("https://evil.test")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
