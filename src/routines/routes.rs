//! REST endpoints for routines.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::routines::RoutineView;
use crate::store::Store;

/// Shared state for routine routes.
#[derive(Clone)]
pub struct RoutineState {
    pub store: Arc<dyn Store>,
}

/// Build the routine REST routes (plus /health).
pub fn routine_routes(state: RoutineState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routines", get(list_routines).post(create_routine))
        .route("/routines/{id}", patch(rename_routine))
        .route("/routines/{id}/toggle", post(toggle_routine))
        .with_state(state)
}

/// The calendar date all streak decisions are made against.
fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn require_title(title: &str) -> ApiResult<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation("title is required".to_string()));
    }
    Ok(trimmed)
}

#[derive(Debug, Deserialize)]
struct CreateRoutine {
    title: String,
}

#[derive(Debug, Deserialize)]
struct RenameRoutine {
    title: String,
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// GET /routines — all routines, ascending id.
async fn list_routines(State(state): State<RoutineState>) -> ApiResult<Json<Vec<RoutineView>>> {
    let today = today();
    let routines = state.store.list_routines().await?;
    Ok(Json(routines.iter().map(|r| r.view(today)).collect()))
}

/// POST /routines — create with default counters.
async fn create_routine(
    State(state): State<RoutineState>,
    Json(payload): Json<CreateRoutine>,
) -> ApiResult<Json<RoutineView>> {
    let title = require_title(&payload.title)?;
    let routine = state.store.create_routine(title).await?;
    info!(id = routine.id, title = %routine.title, "Routine created");
    Ok(Json(routine.view(today())))
}

/// PATCH /routines/{id} — rename.
async fn rename_routine(
    State(state): State<RoutineState>,
    Path(id): Path<i64>,
    Json(payload): Json<RenameRoutine>,
) -> ApiResult<Json<RoutineView>> {
    let title = require_title(&payload.title)?;

    let mut routine = state
        .store
        .get_routine(id)
        .await?
        .ok_or(ApiError::NotFound { entity: "routine", id })?;

    routine.title = title.to_string();
    state.store.update_routine(&routine).await?;
    info!(id, title = %routine.title, "Routine renamed");
    Ok(Json(routine.view(today())))
}

/// POST /routines/{id}/toggle — flip today's completion status.
async fn toggle_routine(
    State(state): State<RoutineState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RoutineView>> {
    let today = today();

    let mut routine = state
        .store
        .get_routine(id)
        .await?
        .ok_or(ApiError::NotFound { entity: "routine", id })?;

    routine.toggle(today);
    state.store.update_routine(&routine).await?;
    info!(
        id,
        streak = routine.streak,
        done = routine.last_done_date == Some(today),
        "Routine toggled"
    );
    Ok(Json(routine.view(today)))
}
