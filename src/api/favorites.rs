// Favorites API
//
// A favorite links a user to a character and/or a planet. Creation checks
// every reference; deletion matches on the owner plus exactly one of
// characters_id / planets_id and removes a single row.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use super::response::{ApiResponse, ApiResult};
use crate::db::{
    Character, CreateFavoriteRequest, DeleteFavoriteRequest, Favorite, FavoriteResponse, Planet,
    User,
};
use crate::AppState;

/// Result of a favorite deletion
#[derive(Debug, Serialize)]
pub struct DeletedFavorite {
    pub id: i64,
    pub user_id: i64,
}

async fn require_user(conn: &mut sqlx::SqliteConnection, user_id: i64) -> Result<User, ApiError> {
    User::get_by_id(conn, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// List a user's favorites
///
/// GET /users/:id/favoritos
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
) -> ApiResult<Vec<FavoriteResponse>> {
    let mut conn = state.db.acquire().await?;
    require_user(&mut conn, user_id).await?;

    let favorites = Favorite::list_for_user(&mut conn, user_id).await?;
    Ok(ApiResponse::ok(favorites))
}

/// Add a favorite for a user
///
/// POST /users/:id/favoritos
pub async fn create_favorite(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateFavoriteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FavoriteResponse>>), ApiError> {
    if req.characters_id.is_none() && req.planets_id.is_none() {
        return Err(ApiError::bad_request(
            "One of characters_id or planets_id is required",
        ));
    }

    let mut tx = state.db.begin().await?;
    require_user(&mut tx, user_id).await?;

    if let Some(id) = req.characters_id {
        if !Character::exists(&mut tx, id).await? {
            return Err(ApiError::not_found("Character not found"));
        }
    }
    if let Some(id) = req.planets_id {
        if !Planet::exists(&mut tx, id).await? {
            return Err(ApiError::not_found("Planet not found"));
        }
    }

    let favorite = Favorite::create(&mut tx, user_id, req.characters_id, req.planets_id).await?;
    tx.commit().await?;

    info!(
        favorite_id = favorite.id,
        user_id,
        characters_id = ?req.characters_id,
        planets_id = ?req.planets_id,
        "Favorite created"
    );
    Ok((StatusCode::CREATED, ApiResponse::ok(favorite)))
}

/// Remove one favorite of a user, matched by character or planet
///
/// DELETE /users/:id/favoritos
pub async fn delete_favorite(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<DeleteFavoriteRequest>,
) -> ApiResult<DeletedFavorite> {
    let target = req.target().map_err(ApiError::bad_request)?;

    let mut tx = state.db.begin().await?;
    let favorite = Favorite::find_for_user(&mut tx, user_id, target)
        .await?
        .ok_or_else(|| ApiError::not_found("Favorite not found"))?;

    if !Favorite::delete(&mut tx, favorite.id).await? {
        return Err(ApiError::not_found("Favorite not found"));
    }
    tx.commit().await?;

    info!(favorite_id = favorite.id, user_id, "Favorite deleted");
    Ok(ApiResponse::ok(DeletedFavorite {
        id: favorite.id,
        user_id,
    }))
}
