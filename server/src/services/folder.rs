//! Folder service: create, list, and delete a user's folders.
//!
//! DESIGN
//! ======
//! Folders are a flat, per-user grouping for plays. Deleting a folder
//! removes its plays through the `ON DELETE CASCADE` foreign key, so the
//! service never touches the plays table directly.

use serde_json::Value;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FolderError {
    #[error("folder not found: {0}")]
    NotFound(Uuid),
    #[error("{0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row returned from folder queries.
#[derive(Debug, Clone)]
pub struct FolderRow {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// Folder with the number of plays it holds.
#[derive(Debug, Clone)]
pub struct FolderSummary {
    pub folder: FolderRow,
    pub play_count: i64,
}

/// Validated `POST /api/folders` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFolder {
    pub name: String,
}

/// Parse a folder creation body.
///
/// # Errors
///
/// Returns `Invalid` for a non-object body or a missing, blank, or
/// overlong name.
pub fn parse_new_folder(body: &Value) -> Result<NewFolder, FolderError> {
    let Some(obj) = body.as_object() else {
        return Err(FolderError::Invalid("body: must be an object".into()));
    };
    let name = super::validate_name("name", obj.get("name")).map_err(FolderError::Invalid)?;
    Ok(NewFolder { name })
}

// =============================================================================
// CRUD
// =============================================================================

/// Create a folder owned by `user_id`.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_folder(pool: &PgPool, user_id: Uuid, folder: &NewFolder) -> Result<FolderRow, FolderError> {
    let id = Uuid::new_v4();
    let (created_at,) = sqlx::query_as::<_, (OffsetDateTime,)>(
        "INSERT INTO folders (id, name, user_id) VALUES ($1, $2, $3) RETURNING created_at",
    )
    .bind(id)
    .bind(&folder.name)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    info!(%id, %user_id, "folder created");
    Ok(FolderRow { id, name: folder.name.clone(), user_id, created_at })
}

/// List the user's folders, newest first, with play counts.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_folders(pool: &PgPool, user_id: Uuid) -> Result<Vec<FolderSummary>, FolderError> {
    let rows = sqlx::query_as::<_, (Uuid, String, Uuid, OffsetDateTime, i64)>(
        "SELECT f.id, f.name, f.user_id, f.created_at, COUNT(p.id) AS play_count
         FROM folders f
         LEFT JOIN plays p ON p.folder_id = f.id
         WHERE f.user_id = $1
         GROUP BY f.id
         ORDER BY f.created_at DESC, f.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, user_id, created_at, play_count)| FolderSummary {
            folder: FolderRow { id, name, user_id, created_at },
            play_count,
        })
        .collect())
}

/// Whether the folder exists and belongs to the user.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn folder_exists(pool: &PgPool, user_id: Uuid, folder_id: Uuid) -> Result<bool, FolderError> {
    let row = sqlx::query_as::<_, (Uuid,)>("SELECT id FROM folders WHERE id = $1 AND user_id = $2")
        .bind(folder_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Delete a folder and, by cascade, its plays.
///
/// # Errors
///
/// Returns `NotFound` if the user owns no such folder.
pub async fn delete_folder(pool: &PgPool, user_id: Uuid, folder_id: Uuid) -> Result<(), FolderError> {
    let result = sqlx::query("DELETE FROM folders WHERE id = $1 AND user_id = $2")
        .bind(folder_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(FolderError::NotFound(folder_id));
    }
    info!(%folder_id, %user_id, "folder deleted");
    Ok(())
}

#[cfg(test)]
#[path = "folder_test.rs"]
mod tests;
