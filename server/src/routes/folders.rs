//! Folder routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::ApiError;
use super::user::CurrentUser;
use super::{json_body, parse_id};
use crate::services::folder::{self, FolderRow, FolderSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_count: Option<i64>,
}

impl From<FolderRow> for FolderResponse {
    fn from(row: FolderRow) -> Self {
        Self { id: row.id, name: row.name, user_id: row.user_id, created_at: row.created_at, play_count: None }
    }
}

impl From<FolderSummary> for FolderResponse {
    fn from(summary: FolderSummary) -> Self {
        Self { play_count: Some(summary.play_count), ..summary.folder.into() }
    }
}

/// `GET /api/folders` — list the user's folders with play counts.
pub async fn list_folders(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let rows = folder::list_folders(&state.pool, user_id).await?;
    Ok(Json(rows.into_iter().map(FolderResponse::from).collect()))
}

/// `POST /api/folders` — create a folder.
pub async fn create_folder(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<FolderResponse>), ApiError> {
    let new_folder = folder::parse_new_folder(&json_body(body)?)?;
    let row = folder::create_folder(&state.pool, user_id, &new_folder).await?;
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// `DELETE /api/folders/:id` — delete a folder and its plays.
pub async fn delete_folder(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let folder_id = parse_id("id", &raw_id)?;
    folder::delete_folder(&state.pool, user_id, folder_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "folders_test.rs"]
mod tests;
