use crate::error::AppError;
use crate::extract::AppPath;
use crate::sessions::{mutate, MutationResponse};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions/{id}/consent/toggle", post(toggle))
        .route("/v1/sessions/{id}/consent/turn-off-offers", post(turn_off_offers))
        .route("/v1/sessions/{id}/consent/manage-settings", post(manage_settings))
        .route("/v1/sessions/{id}/consent/chat", post(chat))
}

pub async fn toggle(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.toggle_consent()).await
}

/// POST /v1/sessions/{id}/consent/turn-off-offers
/// Ignored unless the footer is expanded
pub async fn turn_off_offers(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.turn_off_offers()).await
}

pub async fn manage_settings(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.manage_settings()).await
}

pub async fn chat(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.chat()).await
}
