use crate::error::AppError;
use crate::extract::AppPath;
use crate::sessions::{mutate, not_found, MutationResponse};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use earn_core::Transition;
use uuid::Uuid;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions/{id}/order/track", post(track_package))
        .route("/v1/sessions/{id}/order/receipt", post(view_receipt))
        .route("/v1/sessions/{id}/order/copy", post(copy_order_number))
}

/// POST /v1/sessions/{id}/order/track
pub async fn track_package(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.track_package()).await
}

/// POST /v1/sessions/{id}/order/receipt
pub async fn view_receipt(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.view_receipt()).await
}

/// POST /v1/sessions/{id}/order/copy
/// Returns the order number for the client's clipboard
pub async fn copy_order_number(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let experience = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;

    let clipboard = experience.copy_order_number();
    let transition = Transition::from(clipboard.is_some());

    Ok(Json(MutationResponse {
        transition,
        clipboard,
        session: experience.snapshot(),
    }))
}
