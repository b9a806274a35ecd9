use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::info;

use super::auth::hash_password_task;
use super::error::{ApiError, ErrorCode, ValidationErrorBuilder};
use super::extract::{ApiJson, ApiPath};
use super::response::{ApiResponse, ApiResult};
use super::validation::{validate_email, validate_password};
use crate::db::{CreateUserRequest, UpdateUserRequest, User, UserResponse};
use crate::AppState;

/// Map a UNIQUE violation on `users.email` to a readable conflict
fn email_taken(err: sqlx::Error) -> ApiError {
    let err = ApiError::from(err);
    if err.code() == ErrorCode::Conflict {
        ApiError::conflict("Email is already registered")
    } else {
        err
    }
}

/// List all users (password hashes are never returned)
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Vec<UserResponse>> {
    let mut conn = state.db.acquire().await?;
    let users = User::list(&mut conn).await?;

    let responses: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(ApiResponse::ok(responses))
}

/// Get a single user by ID
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<UserResponse> {
    let mut conn = state.db.acquire().await?;
    let user = User::get_by_id(&mut conn, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::ok(UserResponse::from(user)))
}

/// Register a new user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    let mut checks = ValidationErrorBuilder::new();
    checks.check("email", validate_email(req.email.as_deref()));
    checks.check("password", validate_password(req.password.as_deref()));
    checks.finish()?;

    let email = req.email.unwrap_or_default();
    let password = req.password.unwrap_or_default();
    let password_hash = hash_password_task(password).await?;

    let mut tx = state.db.begin().await?;
    let user = User::create(&mut tx, &email, &password_hash, req.is_active.unwrap_or(true))
        .await
        .map_err(email_taken)?;
    tx.commit().await?;

    info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, ApiResponse::ok(UserResponse::from(user))))
}

/// Change a user's email
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    let mut checks = ValidationErrorBuilder::new();
    checks.check("email", validate_email(req.email.as_deref()));
    checks.finish()?;
    let email = req.email.unwrap_or_default();

    let mut tx = state.db.begin().await?;
    let user = User::update_email(&mut tx, id, &email)
        .await
        .map_err(email_taken)?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    tx.commit().await?;

    info!(user_id = user.id, "User email updated");
    Ok(ApiResponse::ok(UserResponse::from(user)))
}
