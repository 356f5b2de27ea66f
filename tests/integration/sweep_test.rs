//! Reaper sweep over records written through the HTTP surface.

use chrono::{TimeDelta, Utc};
use http::StatusCode;

use activity_entity::activity::ListStatus;
use activity_store::ActivityStore;

use crate::helpers::{self, AGENTS_GROUP, TestApp};

const ALICE: &str = "1a1a1a1a-0000-4000-8000-000000000001";
const BOB: &str = "2b2b2b2b-0000-4000-8000-000000000002";

#[tokio::test]
async fn test_sweep_logs_out_only_expired_users() {
    let app = TestApp::new();
    app.directory.add_user(ALICE, &[AGENTS_GROUP], "available");
    app.directory.add_user(BOB, &[AGENTS_GROUP], "offline");

    for (user, presence) in [(ALICE, "available"), (BOB, "offline")] {
        let response = app
            .post_event(&helpers::presence_envelope(user, presence, "def"))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    // Nothing is due yet.
    let early = app.container.reaper.run().await.unwrap();
    assert_eq!(early.examined, 0);
    assert_eq!(app.directory.reauth_calls(), 0);

    let later = Utc::now() + TimeDelta::minutes(16);
    let report = app.container.reaper.run_at(later).await.unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.logged_out, 1);
    assert_eq!(report.cleared, 1);
    assert_eq!(app.directory.logout_calls(), vec![ALICE]);
    assert_eq!(app.directory.reauth_calls(), 1);

    let alice = app.store.get(ALICE).await.unwrap().unwrap();
    assert_eq!(alice.list_status(), ListStatus::Exempt);

    // Idempotent: a second sweep finds nothing.
    let again = app.container.reaper.run_at(later).await.unwrap();
    assert_eq!(again.examined, 0);
}

#[tokio::test]
async fn test_failed_logout_still_clears_deadline_by_default() {
    let app = TestApp::new();
    app.directory.add_user(ALICE, &[AGENTS_GROUP], "available");
    app.directory.fail_logout_for(ALICE);
    app.post_event(&helpers::presence_envelope(ALICE, "available", "def"))
        .await;

    let report = app
        .container
        .reaper
        .run_at(Utc::now() + TimeDelta::hours(1))
        .await
        .unwrap();
    assert_eq!(report.logout_failures, 1);
    assert_eq!(report.cleared, 1);

    let pending = app
        .store
        .list_all(ListStatus::Pending, None, 10)
        .await
        .unwrap();
    assert!(pending.is_empty());
}
