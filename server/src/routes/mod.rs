//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the folders/plays REST surface and the health probe under a single
//! Axum router, with permissive CORS for the browser editor and request
//! tracing for every call.

pub mod error;
pub mod folders;
pub mod plays;
pub mod user;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use self::error::ApiError;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/folders", get(folders::list_folders).post(folders::create_folder))
        .route("/api/folders/{id}", axum::routing::delete(folders::delete_folder))
        .route("/api/folders/{id}/plays", get(plays::folder_plays))
        .route("/api/plays", axum::routing::post(plays::create_play))
        .route("/api/plays/recent", get(plays::recent_plays))
        .route(
            "/api/plays/{id}",
            get(plays::get_play)
                .put(plays::update_play)
                .delete(plays::delete_play),
        )
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Turn a JSON extractor result into a value, reporting bad bodies as
/// validation errors instead of Axum's plain-text rejection.
pub(crate) fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::Validation(format!("body: {}", rejection.body_text()))),
    }
}

/// Parse a UUID path segment.
pub(crate) fn parse_id(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("{field}: must be a UUID")))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
