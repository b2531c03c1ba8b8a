use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::sessions::{mutate, MutationResponse};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::post,
    Json, Router,
};
use earn_shared::{NextStep, Sentiment};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    pub sentiment: Sentiment,
}

#[derive(Debug, Deserialize)]
pub struct TopicsRequest {
    pub topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleTopicRequest {
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct NextStepRequest {
    pub step: NextStep,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions/{id}/feedback/sentiment", post(select_sentiment))
        .route("/v1/sessions/{id}/feedback/survey/start", post(start_survey))
        .route("/v1/sessions/{id}/feedback/survey/decline", post(decline_survey))
        .route("/v1/sessions/{id}/feedback/survey/topics", post(select_topics))
        .route("/v1/sessions/{id}/feedback/survey/toggle", post(toggle_topic))
        .route("/v1/sessions/{id}/feedback/survey/submit", post(submit_survey))
        .route("/v1/sessions/{id}/feedback/next-step", post(choose_next_step))
        .route("/v1/sessions/{id}/feedback/support", post(request_support))
}

/// POST /v1/sessions/{id}/feedback/sentiment
/// Only the first answer is recorded
pub async fn select_sentiment(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<SentimentRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.select_sentiment(req.sentiment)).await
}

pub async fn start_survey(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.start_survey()).await
}

pub async fn decline_survey(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.decline_survey()).await
}

/// POST /v1/sessions/{id}/feedback/survey/topics
/// Adds to the current selection
pub async fn select_topics(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<TopicsRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.select_improvement_topics(req.topics)).await
}

pub async fn toggle_topic(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<ToggleTopicRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    if req.topic.trim().is_empty() {
        return Err(AppError::ValidationError("topic must not be blank".to_string()));
    }
    mutate(&state, id, |exp| exp.toggle_topic(&req.topic)).await
}

pub async fn submit_survey(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.submit_survey()).await
}

pub async fn choose_next_step(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<NextStepRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.choose_next_step(req.step)).await
}

/// POST /v1/sessions/{id}/feedback/support
/// Hands off to the support chat
pub async fn request_support(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MutationResponse>, AppError> {
    mutate(&state, id, |exp| exp.request_support()).await
}
