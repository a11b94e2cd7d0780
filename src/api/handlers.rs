use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{Genre, Playstyle, TimeAvailability, LAST_QUIZ_STEP},
    services::RecommenderError,
    session::{Command, GameCard, SessionSnapshot, SEARCH_FAILURE_MESSAGE},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOptionsResponse {
    pub genres: Vec<Genre>,
    pub playstyles: Vec<Playstyle>,
    pub time_availability: Vec<TimeAvailability>,
    pub steps: u8,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Choices the quiz offers
pub async fn quiz_options() -> Json<QuizOptionsResponse> {
    Json(QuizOptionsResponse {
        genres: Genre::ALL.to_vec(),
        playstyles: Playstyle::ALL.to_vec(),
        time_availability: TimeAvailability::ALL.to_vec(),
        steps: LAST_QUIZ_STEP + 1,
    })
}

/// Start a new session on the welcome view
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let snapshot = state.sessions.create().await;
    (StatusCode::CREATED, Json(snapshot))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SessionSnapshot>> {
    Ok(Json(state.sessions.get(id).await?))
}

/// End a session and discard its state
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a command to a session.
///
/// Submit commands hold the request open until the model call finishes.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(command): Json<Command>,
) -> AppResult<Json<SessionSnapshot>> {
    tracing::info!(
        request_id = %request_id,
        session_id = %id,
        command = ?command,
        "Dispatching session command"
    );

    let snapshot = state
        .sessions
        .dispatch(id, command, &state.recommender)
        .await?;

    tracing::debug!(
        request_id = %request_id,
        session_id = %id,
        view = ?snapshot.view,
        "Session command applied"
    );

    Ok(Json(snapshot))
}

/// Stateless single-game lookup.
///
/// Provider detail is logged and replaced by the generic search message.
pub async fn search_game(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<GameCard>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let game = state
        .recommender
        .search_game(&params.q)
        .await
        .map_err(|e| match e {
            RecommenderError::MissingCredential { .. } => AppError::from(e),
            other => {
                tracing::warn!(
                    request_id = %request_id,
                    query = %params.q,
                    error = %other,
                    "Game search failed"
                );
                AppError::Upstream(SEARCH_FAILURE_MESSAGE.to_string())
            }
        })?;
    Ok(Json(GameCard::from(&game)))
}
