//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use activity_api::AppState;
use activity_core::config::AppConfig;
use activity_directory::mock::MockDirectory;
use activity_entity::directory::PresenceDefinition;
use activity_service::ServiceContainer;
use activity_store::MemoryActivityStore;

pub const AGENTS_GROUP: &str = "e613e69c-a2d4-40fc-aba5-a9a5eb43eeef";
pub const SUPERVISORS_GROUP: &str = "f42fd8d0-3c9b-4db4-b389-c845fcef92c9";
pub const ORG_ID: &str = "org-1";
pub const VALID_TOKEN: &str = "good-token";

const TEST_CONFIG: &str = r#"
    [directory]
    api_domain = "example.com"
    client_id = "id"
    client_secret = "secret"

    [report]
    expected_organization_id = "org-1"

    [[timeout_groups]]
    id = "e613e69c-a2d4-40fc-aba5-a9a5eb43eeef"
    name = "Agents"
    timeout_minutes = 15

    [[timeout_groups]]
    id = "f42fd8d0-3c9b-4db4-b389-c845fcef92c9"
    name = "Supervisors"
    timeout_minutes = 60
"#;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Services behind the router
    pub container: ServiceContainer,
    /// Direct handle on the store
    pub store: Arc<MemoryActivityStore>,
    /// Scripted directory
    pub directory: Arc<MockDirectory>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let config = AppConfig::from_toml_str(TEST_CONFIG).expect("Failed to parse test config");
        let store = Arc::new(MemoryActivityStore::default());
        let directory = Arc::new(MockDirectory::new());
        directory.set_token_organization(VALID_TOKEN, ORG_ID);
        directory.set_token_organization("foreign-token", "org-2");

        let container = ServiceContainer::from_parts(
            config,
            Arc::clone(&store) as _,
            Arc::clone(&directory) as _,
        );
        let router = activity_api::build_app(
            AppState::from_container(&container),
            &container.config.server.cors,
        );

        Self {
            router,
            container,
            store,
            directory,
        }
    }

    /// Register a presence definition with an English label
    pub fn add_presence_label(&self, id: &str, system_presence: &str, label: &str) {
        self.directory.insert_presence(PresenceDefinition {
            id: id.to_string(),
            system_presence: system_presence.to_string(),
            language_labels: [("en_US".to_string(), label.to_string())].into(),
            ..Default::default()
        });
    }

    /// POST an envelope to the event endpoint
    pub async fn post_event(&self, envelope: &Value) -> TestResponse {
        self.request("POST", "/api/events", Some(envelope.to_string()), None)
            .await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(value) = authorization {
            req = req.header("Authorization", value);
        }

        let req = req
            .body(Body::from(body.unwrap_or_default()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Envelope carrying a presence notification
pub fn presence_envelope(user_id: &str, system_presence: &str, definition_id: &str) -> Value {
    json!({
        "version": "0",
        "id": "evt-1",
        "detail-type": "v2.users.{id}.presence",
        "source": "aws.partner/genesys.com",
        "time": "2024-01-01T00:00:00Z",
        "detail": {
            "topicName": format!("v2.users.{user_id}.presence"),
            "version": "2",
            "eventBody": {
                "presenceDefinition": {
                    "id": definition_id,
                    "systemPresence": system_presence
                },
                "source": "PURECLOUD"
            },
            "metadata": { "CorrelationId": "c-1" }
        }
    })
}

/// Envelope carrying a conversation summary with `active_calls` live calls
pub fn conversation_envelope(user_id: &str, active_calls: i64) -> Value {
    json!({
        "detail": {
            "topicName": format!("v2.users.{user_id}.conversationsummary"),
            "eventBody": {
                "call": { "contactCenter": { "active": active_calls, "acw": 0 } }
            }
        }
    })
}
