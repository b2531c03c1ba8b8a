use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use earn_core::{SessionSink, Transition};
use earn_order::{Experience, ExperienceSnapshot};
use earn_shared::View;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub view: View,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub session: ExperienceSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct SelectViewRequest {
    pub view: View,
}

/// Body of every mutating endpoint
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub transition: Transition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clipboard: Option<String>,
    pub session: ExperienceSnapshot,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{id}", get(get_session).delete(delete_session))
        .route("/v1/sessions/{id}/view", post(select_view))
}

/// Run an operation against one session and describe the result
pub(crate) async fn mutate(
    state: &AppState,
    id: Uuid,
    op: impl FnOnce(&mut Experience) -> Transition,
) -> Result<Json<MutationResponse>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let experience = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;

    let transition = op(experience);
    Ok(Json(MutationResponse {
        transition,
        clipboard: None,
        session: experience.snapshot(),
    }))
}

pub(crate) fn not_found(id: Uuid) -> AppError {
    AppError::NotFoundError(format!("Session {} not found", id))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/sessions
/// Mount a fresh experience; the body is optional
pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Option<Json<CreateSessionRequest>>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let req = body?.map(|Json(req)| req).unwrap_or_default();
    let id = Uuid::new_v4();
    let sink = Arc::new(SessionSink::new(id, state.sink.clone()));
    let experience = Experience::with_view(state.experience.clone(), sink, req.view);
    let session = experience.snapshot();

    state.sessions.lock().await.insert(id, experience);
    info!(session_id = %id, view = ?req.view, "Session created");

    Ok((StatusCode::CREATED, Json(SessionResponse { id, session })))
}

/// GET /v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let mut sessions = state.sessions.lock().await;
    let experience = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;

    Ok(Json(SessionResponse {
        id,
        session: experience.snapshot(),
    }))
}

/// DELETE /v1/sessions/{id}
/// Unmounts the experience; pending confirmations are dropped with it
pub async fn delete_session(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    let removed = state.sessions.lock().await.remove(&id);
    if removed.is_none() {
        return Err(not_found(id));
    }

    info!(session_id = %id, "Session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/sessions/{id}/view
pub async fn select_view(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<SelectViewRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.select_view(req.view)).await
}
