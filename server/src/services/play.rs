//! Play service: validated CRUD over the plays table.
//!
//! DESIGN
//! ======
//! A play's diagram is stored as a JSONB array of elements in `canvas`. The
//! array is validated with the editor's own schema before every write, so
//! rows are always decodable back into `Element`s. Reads are scoped to the
//! acting user; a play in another user's folder is reported as not found.
//!
//! ERROR HANDLING
//! ==============
//! Body problems surface as `Invalid` with a `<path>: <message>` string.
//! A missing folder on create, move, or folder listing is `FolderNotFound`,
//! which routes map to 404 like a missing play.

use canvas::doc::Element;
use canvas::schema::validate_elements;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::folder;

pub const DEFAULT_RECENT_LIMIT: i64 = 5;
pub const MAX_RECENT_LIMIT: i64 = 50;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("play not found: {0}")]
    NotFound(Uuid),
    #[error("folder not found: {0}")]
    FolderNotFound(Uuid),
    #[error("{0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<folder::FolderError> for PlayError {
    fn from(err: folder::FolderError) -> Self {
        match err {
            folder::FolderError::NotFound(id) => Self::FolderNotFound(id),
            folder::FolderError::Invalid(message) => Self::Invalid(message),
            folder::FolderError::Database(e) => Self::Database(e),
        }
    }
}

/// Row returned from play queries.
#[derive(Debug, Clone)]
pub struct PlayRow {
    pub id: Uuid,
    pub name: String,
    pub folder_id: Uuid,
    pub user_id: Uuid,
    pub canvas: Vec<Element>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    /// Filled by the recent listing only.
    pub folder_name: Option<String>,
}

type PlayTuple = (Uuid, String, Uuid, Uuid, Json<Vec<Element>>, OffsetDateTime, OffsetDateTime);

impl From<PlayTuple> for PlayRow {
    fn from((id, name, folder_id, user_id, canvas, created_at, updated_at): PlayTuple) -> Self {
        Self { id, name, folder_id, user_id, canvas: canvas.0, created_at, updated_at, folder_name: None }
    }
}

const PLAY_COLUMNS: &str = "id, name, folder_id, user_id, canvas, created_at, updated_at";

/// Validated `POST /api/plays` body.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlay {
    pub name: String,
    pub folder_id: Uuid,
    pub canvas: Vec<Element>,
}

/// Validated `PUT /api/plays/:id` body. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayPatch {
    pub name: Option<String>,
    pub folder_id: Option<Uuid>,
    pub canvas: Option<Vec<Element>>,
}

// =============================================================================
// BODY PARSING
// =============================================================================

fn body_object(body: &Value) -> Result<&serde_json::Map<String, Value>, PlayError> {
    body.as_object()
        .ok_or_else(|| PlayError::Invalid("body: must be an object".into()))
}

fn parse_canvas(value: &Value) -> Result<Vec<Element>, PlayError> {
    validate_elements(value, "canvas").map_err(|e| PlayError::Invalid(e.to_string()))
}

/// Parse and validate a play creation body `{name, folderId, canvas}`.
///
/// # Errors
///
/// Returns `Invalid` describing the first problem found.
pub fn parse_new_play(body: &Value) -> Result<NewPlay, PlayError> {
    let obj = body_object(body)?;
    let name = super::validate_name("name", obj.get("name")).map_err(PlayError::Invalid)?;
    let folder_id = super::validate_uuid("folderId", obj.get("folderId")).map_err(PlayError::Invalid)?;
    let canvas = match obj.get("canvas") {
        None | Some(Value::Null) => return Err(PlayError::Invalid("canvas: required".into())),
        Some(value) => parse_canvas(value)?,
    };
    Ok(NewPlay { name, folder_id, canvas })
}

/// Parse and validate a partial play update body.
///
/// # Errors
///
/// Returns `Invalid` describing the first problem found.
pub fn parse_play_patch(body: &Value) -> Result<PlayPatch, PlayError> {
    let obj = body_object(body)?;
    let name = match obj.get("name") {
        None | Some(Value::Null) => None,
        value => Some(super::validate_name("name", value).map_err(PlayError::Invalid)?),
    };
    let folder_id = match obj.get("folderId") {
        None | Some(Value::Null) => None,
        value => Some(super::validate_uuid("folderId", value).map_err(PlayError::Invalid)?),
    };
    let canvas = match obj.get("canvas") {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_canvas(value)?),
    };
    Ok(PlayPatch { name, folder_id, canvas })
}

/// Default and clamp the `limit` query parameter of the recent listing.
#[must_use]
pub fn clamp_recent_limit(raw: Option<i64>) -> i64 {
    raw.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_RECENT_LIMIT)
}

// =============================================================================
// CRUD
// =============================================================================

async fn ensure_folder(pool: &PgPool, user_id: Uuid, folder_id: Uuid) -> Result<(), PlayError> {
    if folder::folder_exists(pool, user_id, folder_id).await? {
        Ok(())
    } else {
        Err(PlayError::FolderNotFound(folder_id))
    }
}

/// Create a play in one of the user's folders.
///
/// # Errors
///
/// Returns `FolderNotFound` if the folder is missing, or a database error.
pub async fn create_play(pool: &PgPool, user_id: Uuid, play: &NewPlay) -> Result<PlayRow, PlayError> {
    ensure_folder(pool, user_id, play.folder_id).await?;

    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, PlayTuple>(&format!(
        "INSERT INTO plays (id, name, folder_id, user_id, canvas)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {PLAY_COLUMNS}"
    ))
    .bind(id)
    .bind(&play.name)
    .bind(play.folder_id)
    .bind(user_id)
    .bind(Json(&play.canvas))
    .fetch_one(pool)
    .await?;

    info!(%id, folder_id = %play.folder_id, elements = play.canvas.len(), "play created");
    Ok(row.into())
}

/// Most recently updated plays across all of the user's folders.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_recent(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<PlayRow>, PlayError> {
    let rows = sqlx::query_as::<_, (Uuid, String, Uuid, Uuid, Json<Vec<Element>>, OffsetDateTime, OffsetDateTime, String)>(
        "SELECT p.id, p.name, p.folder_id, p.user_id, p.canvas, p.created_at, p.updated_at, f.name
         FROM plays p
         JOIN folders f ON f.id = p.folder_id
         WHERE p.user_id = $1
         ORDER BY p.updated_at DESC, p.id
         LIMIT $2",
    )
    .bind(user_id)
    .bind(clamp_recent_limit(Some(limit)))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, folder_id, user_id, canvas, created_at, updated_at, folder_name)| {
            let mut row = PlayRow::from((id, name, folder_id, user_id, canvas, created_at, updated_at));
            row.folder_name = Some(folder_name);
            row
        })
        .collect())
}

/// Plays in one folder, most recently updated first.
///
/// # Errors
///
/// Returns `FolderNotFound` if the user owns no such folder.
pub async fn list_in_folder(pool: &PgPool, user_id: Uuid, folder_id: Uuid) -> Result<Vec<PlayRow>, PlayError> {
    ensure_folder(pool, user_id, folder_id).await?;

    let rows = sqlx::query_as::<_, PlayTuple>(&format!(
        "SELECT {PLAY_COLUMNS}
         FROM plays
         WHERE folder_id = $1 AND user_id = $2
         ORDER BY updated_at DESC, id"
    ))
    .bind(folder_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PlayRow::from).collect())
}

/// Fetch one play.
///
/// # Errors
///
/// Returns `NotFound` if the user owns no such play.
pub async fn get_play(pool: &PgPool, user_id: Uuid, play_id: Uuid) -> Result<PlayRow, PlayError> {
    let row = sqlx::query_as::<_, PlayTuple>(&format!(
        "SELECT {PLAY_COLUMNS} FROM plays WHERE id = $1 AND user_id = $2"
    ))
    .bind(play_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(PlayError::NotFound(play_id))?;

    Ok(row.into())
}

/// Apply a partial update and bump `updated_at`.
///
/// # Errors
///
/// Returns `NotFound` for a missing play and `FolderNotFound` when moving
/// to a folder the user does not own.
pub async fn update_play(pool: &PgPool, user_id: Uuid, play_id: Uuid, patch: &PlayPatch) -> Result<PlayRow, PlayError> {
    if let Some(folder_id) = patch.folder_id {
        ensure_folder(pool, user_id, folder_id).await?;
    }

    let row = sqlx::query_as::<_, PlayTuple>(&format!(
        "UPDATE plays
         SET name = COALESCE($3, name),
             folder_id = COALESCE($4, folder_id),
             canvas = COALESCE($5, canvas),
             updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {PLAY_COLUMNS}"
    ))
    .bind(play_id)
    .bind(user_id)
    .bind(patch.name.as_deref())
    .bind(patch.folder_id)
    .bind(patch.canvas.as_ref().map(Json))
    .fetch_optional(pool)
    .await?
    .ok_or(PlayError::NotFound(play_id))?;

    info!(%play_id, "play updated");
    Ok(row.into())
}

/// Delete one play.
///
/// # Errors
///
/// Returns `NotFound` if the user owns no such play.
pub async fn delete_play(pool: &PgPool, user_id: Uuid, play_id: Uuid) -> Result<(), PlayError> {
    let result = sqlx::query("DELETE FROM plays WHERE id = $1 AND user_id = $2")
        .bind(play_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(PlayError::NotFound(play_id));
    }
    info!(%play_id, "play deleted");
    Ok(())
}

#[cfg(test)]
#[path = "play_test.rs"]
mod tests;
