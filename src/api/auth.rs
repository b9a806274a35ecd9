use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::ApiJson;
use super::validation::validate_required;
use crate::config::AuthConfig;
use crate::db::{LoginRequest, LoginResponse, ProfileResponse, User};
use crate::AppState;

/// Hash a password using Argon2 with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash. The comparison is constant-time.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// `hash_password` on the blocking pool
pub async fn hash_password_task(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))
}

/// `verify_password` on the blocking pool
pub async fn verify_password_task(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("Password verification task failed: {}", e)))
}

/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Email of the user the token was issued to
    pub sub: String,
    /// User id
    pub uid: i64,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Missing Authorization Header")]
    Missing,
    #[error("Authorization header must use the Bearer scheme")]
    Malformed,
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("Failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(e) => {
                tracing::error!("Failed to sign access token: {}", e);
                ApiError::internal("Failed to issue access token")
            }
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

/// Issue a signed HS256 access token for `user`
pub fn issue_token(config: &AuthConfig, user: &User) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.email.clone(),
        uid: user.id,
        iat: now.timestamp(),
        exp: (now + Duration::minutes(config.token_ttl_minutes)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Verify signature and expiry of an access token
pub fn decode_token(config: &AuthConfig, token: &str) -> Result<Claims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                TokenError::Expired
            } else {
                TokenError::Invalid(e)
            }
        })
}

/// Extract the bearer token from request headers
fn extract_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::Malformed)?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(TokenError::Malformed),
    }
}

/// The authenticated caller, resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub email: String,
}

/// Validate a token and resolve it to the user it was issued for. The email
/// is re-read from the store so it reflects later updates.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = decode_token(&state.config.auth, token)?;

    let mut conn = state.db.acquire().await?;
    let user = User::get_by_id(&mut conn, claims.uid)
        .await?
        .ok_or_else(|| ApiError::unauthorized("User no longer exists"))?;

    Ok(AuthUser {
        email: user.email,
    })
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;
        authenticate(state, token).await
    }
}

/// Login endpoint
///
/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let mut checks = ValidationErrorBuilder::new();
    checks.check("email", validate_required(request.email.as_deref(), "Email"));
    checks.check("password", validate_required(request.password.as_deref(), "Password"));
    checks.finish()?;

    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let mut conn = state.db.acquire().await?;
    let user = User::get_by_email(&mut conn, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    drop(conn);

    if !verify_password_task(password, user.password_hash.clone()).await? {
        warn!(user_id = user.id, "Login failed: bad password");
        return Err(ApiError::unauthorized("Bad email or password"));
    }

    let access_token = issue_token(&state.config.auth, &user)?;
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse { access_token }))
}

/// Identity of the caller
///
/// GET /profile
pub async fn profile(user: AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        logged_in_as: user.email,
    })
}
