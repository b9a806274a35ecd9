pub mod auth;
mod characters;
pub mod error;
mod extract;
mod favorites;
mod planets;
mod response;
mod users;
mod validation;

#[cfg(test)]
pub(crate) mod testing;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::AppState;
use error::ApiError;

/// Build the route table: every (method, path) the service answers.
pub fn create_router(state: Arc<AppState>) -> Router {
    let favorites = get(favorites::list_favorites)
        .post(favorites::create_favorite)
        .delete(favorites::delete_favorite);

    Router::new()
        .route("/health", get(health_check))
        // Auth
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
        // Characters
        .route(
            "/characters",
            get(characters::list_characters).post(characters::create_character),
        )
        .route("/characters/:id", get(characters::get_character))
        // Planets
        .route(
            "/planets",
            get(planets::list_planets).post(planets::create_planet),
        )
        .route("/planets/:id", get(planets::get_planet))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        // Favorites, with and without the trailing slash
        .route("/users/:id/favoritos", favorites.clone())
        .route("/users/:id/favoritos/", favorites)
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
