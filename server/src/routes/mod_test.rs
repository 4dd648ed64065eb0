use super::*;
use crate::state::test_helpers;

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[test]
fn parse_id_accepts_uuid_and_names_field() {
    let id = Uuid::new_v4();
    assert_eq!(parse_id("id", &id.to_string()).unwrap(), id);
    let err = parse_id("folderId", "abc").unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref m) if m == "folderId: must be a UUID"));
}

#[test]
fn json_body_passes_value_through() {
    let value = json_body(Ok(Json(serde_json::json!({ "name": "x" })))).unwrap();
    assert_eq!(value["name"], "x");
}

#[tokio::test]
async fn app_builds_with_lazy_pool() {
    let _router = app(test_helpers::test_app_state());
}
