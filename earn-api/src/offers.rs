use crate::error::AppError;
use crate::extract::AppPath;
use crate::sessions::{mutate, MutationResponse};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use earn_shared::OfferId;
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions/{id}/offers/skip-all", post(skip_all))
        .route("/v1/sessions/{id}/offers/remind-later", post(remind_later))
        .route("/v1/sessions/{id}/offers/{offer_id}/accept", post(accept_offer))
        .route("/v1/sessions/{id}/offers/{offer_id}/skip", post(skip_offer))
        .route("/v1/sessions/{id}/offers/{offer_id}/details", post(toggle_details))
}

/// POST /v1/sessions/{id}/offers/{offer_id}/accept
/// Confirmation (and the `offer_accepted` event) follows after the accept delay
pub async fn accept_offer(
    State(state): State<AppState>,
    AppPath((id, offer_id)): AppPath<(Uuid, String)>,
) -> Result<Json<MutationResponse>, AppError> {
    let offer_id = OfferId::new(offer_id);
    mutate(&state, id, |exp| exp.accept_offer(&offer_id)).await
}

/// POST /v1/sessions/{id}/offers/{offer_id}/skip
pub async fn skip_offer(
    State(state): State<AppState>,
    AppPath((id, offer_id)): AppPath<(Uuid, String)>,
) -> Result<Json<MutationResponse>, AppError> {
    let offer_id = OfferId::new(offer_id);
    mutate(&state, id, |exp| exp.skip_offer(&offer_id)).await
}

/// POST /v1/sessions/{id}/offers/{offer_id}/details
pub async fn toggle_details(
    State(state): State<AppState>,
    AppPath((id, offer_id)): AppPath<(Uuid, String)>,
) -> Result<Json<MutationResponse>, AppError> {
    let offer_id = OfferId::new(offer_id);
    mutate(&state, id, |exp| exp.toggle_offer_details(&offer_id)).await
}

/// POST /v1/sessions/{id}/offers/skip-all
pub async fn skip_all(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.skip_all()).await
}

/// POST /v1/sessions/{id}/offers/remind-later
pub async fn remind_later(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.remind_later()).await
}
