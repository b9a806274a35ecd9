use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{ApiJson, ApiPath};
use super::response::{ApiResponse, ApiResult};
use super::validation::validate_text;
use crate::db::{CreatePlanetRequest, Planet};
use crate::AppState;

/// List all planets
pub async fn list_planets(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Planet>> {
    let mut conn = state.db.acquire().await?;
    let planets = Planet::list(&mut conn).await?;
    Ok(ApiResponse::ok(planets))
}

/// Get a single planet by ID
pub async fn get_planet(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Planet> {
    let mut conn = state.db.acquire().await?;
    let planet = Planet::get_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Planet not found"))?;

    Ok(ApiResponse::ok(planet))
}

/// Create a new planet
pub async fn create_planet(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePlanetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Planet>>), ApiError> {
    let mut checks = ValidationErrorBuilder::new();
    checks.check("name", validate_text(&req.name));
    checks.check("climate", validate_text(&req.climate));
    checks.finish()?;

    let mut tx = state.db.begin().await?;
    let planet = Planet::create(&mut tx, &req).await?;
    tx.commit().await?;

    info!(planet_id = planet.id, "Planet created");
    Ok((StatusCode::CREATED, ApiResponse::ok(planet)))
}
