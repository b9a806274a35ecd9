use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{ApiJson, ApiPath};
use super::response::{ApiResponse, ApiResult};
use super::validation::validate_text;
use crate::db::{Character, CreateCharacterRequest};
use crate::AppState;

/// List all characters
pub async fn list_characters(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Character>> {
    let mut conn = state.db.acquire().await?;
    let characters = Character::list(&mut conn).await?;
    Ok(ApiResponse::ok(characters))
}

/// Get a single character by ID
pub async fn get_character(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Character> {
    let mut conn = state.db.acquire().await?;
    let character = Character::get_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Character not found"))?;

    Ok(ApiResponse::ok(character))
}

/// Create a new character
pub async fn create_character(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Character>>), ApiError> {
    let mut checks = ValidationErrorBuilder::new();
    checks.check("name", validate_text(&req.name));
    checks.check("gender", validate_text(&req.gender));
    checks.check("skin_color", validate_text(&req.skin_color));
    checks.check("eye_color", validate_text(&req.eye_color));
    checks.finish()?;

    let mut tx = state.db.begin().await?;
    let character = Character::create(&mut tx, &req).await?;
    tx.commit().await?;

    info!(character_id = character.id, "Character created");
    Ok((StatusCode::CREATED, ApiResponse::ok(character)))
}
