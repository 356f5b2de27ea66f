//! Report data through `GET /api/report/data`.

use chrono::{TimeDelta, Utc};
use http::StatusCode;

use activity_entity::activity::ActivityState;
use activity_store::ActivityStore;

use crate::helpers::{AGENTS_GROUP, TestApp, VALID_TOKEN};

const REPORT: &str = "/api/report/data";

async fn seed(app: &TestApp) {
    let now = Utc::now();

    let mut pending = ActivityState::new("pending-user", now);
    pending.presence = "available".into();
    pending.secondary_presence_id = "available-def".into();
    pending.group_id = AGENTS_GROUP.into();
    pending.inactivity_deadline = Some(now + TimeDelta::minutes(15));
    app.store.put(&pending).await.unwrap();

    let mut exempt = ActivityState::new("exempt-user", now);
    exempt.presence = "offline".into();
    exempt.secondary_presence_id = "unknown-def".into();
    app.store.put(&exempt).await.unwrap();

    app.directory
        .add_user("pending-user", &[AGENTS_GROUP], "available");
    app.add_presence_label("available-def", "available", "Available");
}

#[tokio::test]
async fn test_report_requires_bearer() {
    let app = TestApp::new();

    let missing = app.request("GET", REPORT, None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let basic = app.request("GET", REPORT, None, Some("Basic abc")).await;
    assert_eq!(basic.status, StatusCode::UNAUTHORIZED);

    let empty = app.request("GET", REPORT, None, Some("Bearer ")).await;
    assert_eq!(empty.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_report_rejects_foreign_organization() {
    let app = TestApp::new();

    let response = app
        .request("GET", REPORT, None, Some("Bearer foreign-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Unauthorized");

    let unknown = app
        .request("GET", REPORT, None, Some("Bearer never-issued"))
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_report_joins_directory_data() {
    let app = TestApp::new();
    seed(&app).await;

    let response = app
        .request("GET", REPORT, None, Some(&format!("Bearer {VALID_TOKEN}")))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let entries = response.body.as_array().expect("flat array");
    assert_eq!(entries.len(), 2);

    let first = &entries[0];
    assert_eq!(first["userId"], "pending-user");
    assert_eq!(first["status"], "pending");
    assert_eq!(first["userName"], "User pending-user");
    assert_eq!(first["userImage"], "");
    assert_eq!(first["secondaryPresenceName"], "Available");
    assert_eq!(first["groupName"], "Agents (15 minutes)");
    assert!(first["inactivityDeadline"].is_i64());

    let second = &entries[1];
    assert_eq!(second["userId"], "exempt-user");
    assert_eq!(second["status"], "exempt");
    assert_eq!(second["userName"], "N/A");
    assert_eq!(second["userImage"], "N/A");
    assert_eq!(second["secondaryPresenceName"], "N/A");
    assert_eq!(second["groupName"], "N/A");

    assert_eq!(app.directory.batch_calls().len(), 1);
}

#[tokio::test]
async fn test_report_denied_when_directory_unreachable() {
    let app = TestApp::new();
    seed(&app).await;
    app.directory.set_unreachable(true);

    let response = app
        .request("GET", REPORT, None, Some(&format!("Bearer {VALID_TOKEN}")))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
