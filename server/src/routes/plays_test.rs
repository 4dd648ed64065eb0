use axum::response::IntoResponse;
use serde_json::json;
use time::macros::datetime;

use super::*;
use crate::state::test_helpers;

fn user() -> CurrentUser {
    CurrentUser(Uuid::nil())
}

#[tokio::test]
async fn create_play_with_untyped_element_is_400() {
    let state = test_helpers::test_app_state();
    let body = json!({
        "name": "Broken",
        "folderId": Uuid::new_v4().to_string(),
        "canvas": [{ "id": "p1", "x": 100, "y": 100 }]
    });
    let err = create_play(State(state), user(), Ok(Json(body))).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref m) if m.starts_with("canvas[0].type")), "got {err:?}");

    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["error"], "validation");
}

#[tokio::test]
async fn create_play_with_short_arrow_points_is_400() {
    let state = test_helpers::test_app_state();
    let body = json!({
        "name": "Arrow",
        "folderId": Uuid::new_v4().to_string(),
        "canvas": [{ "id": "a", "type": "shootArrow", "x": 0, "y": 0, "points": [0, 0, 5] }]
    });
    let result = create_play(State(state), user(), Ok(Json(body))).await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn update_play_rejects_bad_canvas_before_lookup() {
    let state = test_helpers::test_app_state();
    let body = json!({ "canvas": [{ "id": "t", "type": "text", "x": 1, "y": 1, "text": 42 }] });
    let result = update_play(State(state), user(), Path(Uuid::new_v4().to_string()), Ok(Json(body))).await;
    assert!(matches!(result, Err(ApiError::Validation(ref m)) if m.starts_with("canvas[0].text")));
}

#[tokio::test]
async fn get_play_rejects_malformed_id() {
    let state = test_helpers::test_app_state();
    let result = get_play(State(state), user(), Path("latest".into())).await;
    assert!(matches!(result, Err(ApiError::Validation(ref m)) if m == "id: must be a UUID"));
}

#[test]
fn recent_limit_parses_defaults_and_clamps() {
    assert_eq!(recent_limit(None).unwrap(), 5);
    assert_eq!(recent_limit(Some("")).unwrap(), 5);
    assert_eq!(recent_limit(Some("10")).unwrap(), 10);
    assert_eq!(recent_limit(Some("0")).unwrap(), 1);
    assert_eq!(recent_limit(Some("1000")).unwrap(), 50);
    assert!(matches!(recent_limit(Some("ten")), Err(ApiError::Validation(_))));
}

#[test]
fn play_response_serializes_wire_shape() {
    let row = PlayRow {
        id: Uuid::nil(),
        name: "Clear".into(),
        folder_id: Uuid::nil(),
        user_id: Uuid::nil(),
        canvas: Vec::new(),
        created_at: datetime!(2026-01-01 0:00 UTC),
        updated_at: datetime!(2026-01-02 12:30 UTC),
        folder_name: Some("Offense".into()),
    };
    let value = serde_json::to_value(PlayResponse::from(row)).unwrap();
    assert_eq!(value["folderId"], Uuid::nil().to_string());
    assert_eq!(value["updatedAt"], "2026-01-02T12:30:00Z");
    assert_eq!(value["folderName"], "Offense");
    assert_eq!(value["canvas"], json!([]));
}
