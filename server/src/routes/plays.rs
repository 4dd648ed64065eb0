//! Play routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use canvas::doc::Element;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::ApiError;
use super::user::CurrentUser;
use super::{json_body, parse_id};
use crate::services::play::{self, PlayRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResponse {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Uuid,
    pub user_id: Uuid,
    pub canvas: Vec<Element>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
}

impl From<PlayRow> for PlayResponse {
    fn from(row: PlayRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            folder_id: row.folder_id,
            user_id: row.user_id,
            canvas: row.canvas,
            created_at: row.created_at,
            updated_at: row.updated_at,
            folder_name: row.folder_name,
        }
    }
}

fn to_responses(rows: Vec<PlayRow>) -> Json<Vec<PlayResponse>> {
    Json(rows.into_iter().map(PlayResponse::from).collect())
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<String>,
}

/// Parse the optional `limit` query value, then default and clamp it.
pub(crate) fn recent_limit(raw: Option<&str>) -> Result<i64, ApiError> {
    let parsed = match raw.map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(
            value
                .parse::<i64>()
                .map_err(|_| ApiError::Validation("limit: must be an integer".into()))?,
        ),
    };
    Ok(play::clamp_recent_limit(parsed))
}

/// `GET /api/plays/recent?limit=N` — most recently updated plays.
pub async fn recent_plays(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<PlayResponse>>, ApiError> {
    let limit = recent_limit(query.limit.as_deref())?;
    let rows = play::list_recent(&state.pool, user_id, limit).await?;
    Ok(to_responses(rows))
}

/// `GET /api/folders/:folderId/plays` — plays in one folder.
pub async fn folder_plays(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(raw_folder_id): Path<String>,
) -> Result<Json<Vec<PlayResponse>>, ApiError> {
    let folder_id = parse_id("folderId", &raw_folder_id)?;
    let rows = play::list_in_folder(&state.pool, user_id, folder_id).await?;
    Ok(to_responses(rows))
}

/// `GET /api/plays/:id` — fetch one play.
pub async fn get_play(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<PlayResponse>, ApiError> {
    let play_id = parse_id("id", &raw_id)?;
    let row = play::get_play(&state.pool, user_id, play_id).await?;
    Ok(Json(row.into()))
}

/// `POST /api/plays` — create a play from `{name, folderId, canvas}`.
pub async fn create_play(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayResponse>), ApiError> {
    let new_play = play::parse_new_play(&json_body(body)?)?;
    let row = play::create_play(&state.pool, user_id, &new_play).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// `PUT /api/plays/:id` — partial update of name, folder, or canvas.
pub async fn update_play(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(raw_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PlayResponse>, ApiError> {
    let play_id = parse_id("id", &raw_id)?;
    let patch = play::parse_play_patch(&json_body(body)?)?;
    let row = play::update_play(&state.pool, user_id, play_id, &patch).await?;
    Ok(Json(row.into()))
}

/// `DELETE /api/plays/:id` — delete one play.
pub async fn delete_play(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let play_id = parse_id("id", &raw_id)?;
    play::delete_play(&state.pool, user_id, play_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "plays_test.rs"]
mod tests;
