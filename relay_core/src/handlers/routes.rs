//! Relay endpoints

use crate::{
    error::{AppError, Result},
    extractors::LenientJson,
    models::{ContactMessage, EmailDispatchResult, Quote, QuoteRequest},
    AppState,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/quote", post(handle_quote))
        .route("/send-email", post(handle_send_email))
        .route("/health", get(super::health::handle_health))
}

async fn handle_quote(
    State(state): State<AppState>,
    LenientJson(request): LenientJson<QuoteRequest>,
) -> Result<Json<Quote>> {
    info!("POST /quote - lang: {}", request.lang);

    let outcome = state.quote_service.get_quote(&request.lang).await?;

    info!(fallback = outcome.is_fallback(), "quote ready");
    Ok(Json(outcome.into_quote()))
}

async fn handle_send_email(
    State(state): State<AppState>,
    LenientJson(contact): LenientJson<ContactMessage>,
) -> Result<Json<EmailDispatchResult>> {
    info!("POST /send-email");

    let result = state.email_service.send_contact_email(contact).await?;
    Ok(Json(result))
}

pub async fn handle_not_found() -> AppError {
    AppError::NotFound
}
