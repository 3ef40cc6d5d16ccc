//! REST endpoint for character generation.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::character::generator::{CharacterGenerator, CharacterProfile};
use crate::error::{ApiError, ApiResult};

/// Shared state for character routes.
#[derive(Clone)]
pub struct CharacterState {
    pub generator: Arc<CharacterGenerator>,
}

/// Build the character REST routes.
pub fn character_routes(state: CharacterState) -> Router {
    Router::new()
        .route("/api/character/generate", post(generate_character))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    assistant_name: String,
    character_description: String,
}

/// POST /api/character/generate
///
/// Validation happens before any external call is made.
async fn generate_character(
    State(state): State<CharacterState>,
    Json(payload): Json<GenerateRequest>,
) -> ApiResult<Json<CharacterProfile>> {
    let name = payload.assistant_name.trim();
    let description = payload.character_description.trim();
    if name.is_empty() || description.is_empty() {
        return Err(ApiError::Validation(
            "assistant_name / character_description required".to_string(),
        ));
    }

    let profile = state.generator.generate(name, description).await?;
    Ok(Json(profile))
}
