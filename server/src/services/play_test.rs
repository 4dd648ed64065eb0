use serde_json::json;

use super::*;
#[cfg(feature = "live-db-tests")]
use crate::services::folder::{NewFolder, create_folder};
#[cfg(feature = "live-db-tests")]
use crate::state::test_helpers;

fn player_json() -> Value {
    json!({ "id": "p1", "type": "player", "x": 100, "y": 100, "position": "A", "team": "blue" })
}

#[test]
fn parse_new_play_accepts_valid_body() {
    let folder_id = Uuid::new_v4();
    let play = parse_new_play(&json!({
        "name": " Fast break ",
        "folderId": folder_id.to_string(),
        "canvas": [player_json(), { "id": "a1", "type": "moveArrow", "x": 100, "y": 100, "points": [100, 100, 200, 150] }]
    }))
    .unwrap();
    assert_eq!(play.name, "Fast break");
    assert_eq!(play.folder_id, folder_id);
    assert_eq!(play.canvas.len(), 2);
    assert_eq!(play.canvas[1].points.as_deref(), Some(&[100.0, 100.0, 200.0, 150.0][..]));
}

#[test]
fn parse_new_play_reports_element_missing_type() {
    let err = parse_new_play(&json!({
        "name": "Broken",
        "folderId": Uuid::nil().to_string(),
        "canvas": [{ "id": "x", "x": 1, "y": 2 }]
    }))
    .unwrap_err();
    assert!(matches!(err, PlayError::Invalid(_)));
    assert!(err.to_string().starts_with("canvas[0].type"), "got {err}");
}

#[test]
fn parse_new_play_requires_every_field() {
    let id = Uuid::nil().to_string();
    let missing_canvas = parse_new_play(&json!({ "name": "n", "folderId": id })).unwrap_err();
    assert_eq!(missing_canvas.to_string(), "canvas: required");

    let missing_folder = parse_new_play(&json!({ "name": "n", "canvas": [] })).unwrap_err();
    assert_eq!(missing_folder.to_string(), "folderId: required");

    let missing_name = parse_new_play(&json!({ "folderId": id, "canvas": [] })).unwrap_err();
    assert_eq!(missing_name.to_string(), "name: required");
}

#[test]
fn parse_new_play_accepts_empty_canvas() {
    let play = parse_new_play(&json!({ "name": "Blank", "folderId": Uuid::nil().to_string(), "canvas": [] })).unwrap();
    assert!(play.canvas.is_empty());
}

#[test]
fn parse_play_patch_treats_absent_and_null_as_unchanged() {
    assert_eq!(parse_play_patch(&json!({})).unwrap(), PlayPatch::default());
    assert_eq!(
        parse_play_patch(&json!({ "name": null, "folderId": null, "canvas": null })).unwrap(),
        PlayPatch::default()
    );
}

#[test]
fn parse_play_patch_revalidates_canvas() {
    let err = parse_play_patch(&json!({ "canvas": [{ "id": "a", "type": "passArrow", "x": 0, "y": 0, "points": [1, 2] }] }))
        .unwrap_err();
    assert!(err.to_string().starts_with("canvas[0].points"), "got {err}");
}

#[test]
fn parse_play_patch_reads_fields() {
    let folder_id = Uuid::new_v4();
    let patch = parse_play_patch(&json!({ "name": "Renamed", "folderId": folder_id.to_string(), "canvas": [player_json()] }))
        .unwrap();
    assert_eq!(patch.name.as_deref(), Some("Renamed"));
    assert_eq!(patch.folder_id, Some(folder_id));
    assert_eq!(patch.canvas.map(|c| c.len()), Some(1));
}

#[test]
fn parse_play_patch_rejects_blank_name() {
    let err = parse_play_patch(&json!({ "name": "" })).unwrap_err();
    assert_eq!(err.to_string(), "name: must not be blank");
}

#[test]
fn clamp_recent_limit_defaults_and_clamps() {
    assert_eq!(clamp_recent_limit(None), DEFAULT_RECENT_LIMIT);
    assert_eq!(clamp_recent_limit(Some(0)), 1);
    assert_eq!(clamp_recent_limit(Some(-4)), 1);
    assert_eq!(clamp_recent_limit(Some(12)), 12);
    assert_eq!(clamp_recent_limit(Some(500)), MAX_RECENT_LIMIT);
}

#[test]
fn folder_error_converts_to_play_error() {
    let id = Uuid::new_v4();
    assert!(matches!(PlayError::from(folder::FolderError::NotFound(id)), PlayError::FolderNotFound(x) if x == id));
    assert!(matches!(PlayError::from(folder::FolderError::Invalid("m".into())), PlayError::Invalid(m) if m == "m"));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn play_crud_round_trip() {
    let pool = test_helpers::live_pool().await;
    let user_id = Uuid::new_v4();
    let folder = create_folder(&pool, user_id, &NewFolder { name: "Offense".into() })
        .await
        .expect("create_folder should succeed");

    let new_play = parse_new_play(&json!({
        "name": "Clear",
        "folderId": folder.id.to_string(),
        "canvas": [player_json()]
    }))
    .expect("valid body");
    let created = create_play(&pool, user_id, &new_play).await.expect("create_play should succeed");
    assert_eq!(created.canvas.len(), 1);

    let patch = PlayPatch { name: Some("Clear v2".into()), ..PlayPatch::default() };
    let updated = update_play(&pool, user_id, created.id, &patch).await.expect("update_play should succeed");
    assert_eq!(updated.name, "Clear v2");
    assert_eq!(updated.canvas, created.canvas);
    assert!(updated.updated_at >= created.updated_at);

    let recent = list_recent(&pool, user_id, 5).await.expect("list_recent should succeed");
    assert_eq!(recent[0].folder_name.as_deref(), Some("Offense"));

    let in_folder = list_in_folder(&pool, user_id, folder.id).await.expect("list_in_folder should succeed");
    assert_eq!(in_folder.len(), 1);

    let other_user = get_play(&pool, Uuid::new_v4(), created.id).await;
    assert!(matches!(other_user, Err(PlayError::NotFound(_))));

    delete_play(&pool, user_id, created.id).await.expect("delete_play should succeed");
    assert!(matches!(get_play(&pool, user_id, created.id).await, Err(PlayError::NotFound(_))));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn create_play_in_missing_folder_is_folder_not_found() {
    let pool = test_helpers::live_pool().await;
    let play = NewPlay { name: "Orphan".into(), folder_id: Uuid::new_v4(), canvas: Vec::new() };
    let result = create_play(&pool, Uuid::new_v4(), &play).await;
    assert!(matches!(result, Err(PlayError::FolderNotFound(_))));
}
