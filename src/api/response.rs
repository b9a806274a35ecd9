//! Success envelope shared by the catalog endpoints.

use axum::Json;
use serde::Serialize;

use super::error::ApiError;

/// `{"msg": "ok", "results": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub msg: String,
    pub results: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(results: T) -> Json<Self> {
        Json(Self {
            msg: "ok".to_string(),
            results,
        })
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
