//! Event ingestion through `POST /api/events`.

use chrono::{TimeDelta, Utc};
use http::StatusCode;
use serde_json::json;

use activity_entity::activity::ListStatus;
use activity_store::ActivityStore;

use crate::helpers::{self, AGENTS_GROUP, SUPERVISORS_GROUP, TestApp};

const USER: &str = "0b0b0c57-8a34-4c8f-a5b0-2d2f4b1c9e01";

#[tokio::test]
async fn test_first_presence_event_creates_pending_record() {
    let app = TestApp::new();
    app.directory.add_user(USER, &[AGENTS_GROUP], "available");

    let before = Utc::now();
    let response = app
        .post_event(&helpers::presence_envelope(USER, "available", "available-def"))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "pending");
    assert_eq!(response.body["data"]["event"], "presence");

    let stored = app.store.get(USER).await.unwrap().expect("record stored");
    assert_eq!(stored.group_id, AGENTS_GROUP);
    let deadline = stored.inactivity_deadline.expect("deadline set");
    assert!(deadline >= before + TimeDelta::minutes(15));
    assert!(deadline <= Utc::now() + TimeDelta::minutes(15));
    assert_eq!(app.directory.get_user_calls(), vec![USER]);
}

#[tokio::test]
async fn test_longest_group_timeout_wins() {
    let app = TestApp::new();
    app.directory
        .add_user(USER, &[AGENTS_GROUP, SUPERVISORS_GROUP], "available");

    let response = app
        .post_event(&helpers::presence_envelope(USER, "available", "available-def"))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let stored = app.store.get(USER).await.unwrap().unwrap();
    assert_eq!(stored.group_id, SUPERVISORS_GROUP);
}

#[tokio::test]
async fn test_offline_presence_moves_record_to_exempt() {
    let app = TestApp::new();
    app.directory.add_user(USER, &[AGENTS_GROUP], "available");
    app.post_event(&helpers::presence_envelope(USER, "available", "available-def"))
        .await;

    let response = app
        .post_event(&helpers::presence_envelope(USER, "offline", "offline-def"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "exempt");
    assert!(response.body["data"]["inactivityDeadline"].is_null());

    let exempt = app
        .store
        .list_all(ListStatus::Exempt, None, 10)
        .await
        .unwrap();
    assert_eq!(exempt.len(), 1);
    assert_eq!(exempt[0].presence, "offline");
}

#[tokio::test]
async fn test_active_conversation_clears_deadline() {
    let app = TestApp::new();
    app.directory.add_user(USER, &[AGENTS_GROUP], "available");
    app.post_event(&helpers::presence_envelope(USER, "available", "available-def"))
        .await;

    let response = app.post_event(&helpers::conversation_envelope(USER, 1)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["event"], "conversationsummary");
    assert_eq!(response.body["data"]["status"], "exempt");

    let response = app.post_event(&helpers::conversation_envelope(USER, 0)).await;
    assert_eq!(response.body["data"]["status"], "pending");
}

#[tokio::test]
async fn test_unreachable_directory_still_records_event() {
    let app = TestApp::new();
    app.directory.set_unreachable(true);

    let response = app
        .post_event(&helpers::presence_envelope(USER, "available", "available-def"))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let stored = app.store.get(USER).await.unwrap().unwrap();
    assert_eq!(stored.presence, "available");
    assert_eq!(stored.group_id, "");
    assert!(stored.inactivity_deadline.is_none());
}

#[tokio::test]
async fn test_uppercase_uuid_topic_is_rejected() {
    let app = TestApp::new();
    let response = app
        .post_event(&helpers::presence_envelope(
            &USER.to_uppercase(),
            "available",
            "available-def",
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_unknown_topic_kind_is_rejected() {
    let app = TestApp::new();
    let envelope = json!({
        "detail": {
            "topicName": format!("v2.users.{USER}.routingStatus"),
            "eventBody": {}
        }
    });

    let response = app.post_event(&envelope).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/events", Some("{not json".to_string()), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(app.directory.get_user_calls().is_empty());
}
