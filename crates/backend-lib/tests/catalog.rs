mod common;

use std::io;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{app_with, display_body, memory_app, monitor_body};
use hwcatalog_backend_lib::{
    events::{AUDIT, CATALOG},
    storage::{
        Account, AccountStore, FlatFileStorage, MemoryStorage, NewAccount, RecordStore,
        StorageError,
    },
};
use hwcatalog_common::{Display, Monitor, MonitorRecord, RecordId};
use serde_json::json;

#[tokio::test]
async fn test_admin_creates_and_lists_records() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;

    let reply = app.post("/addDisplay", Some(&token), display_body()).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"id": 1}));

    let reply = app.post("/addMonitor", Some(&token), monitor_body(1)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"id": 1}));

    let reply = app.get("/getAll", Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    let monitors = reply.body["monitors"].as_array().unwrap();
    assert_eq!(monitors.len(), 1);
    assert_eq!(
        monitors[0],
        json!({
            "id": 1,
            "voltage": 220.0,
            "display": {
                "id": 1,
                "diag": 27.0,
                "resolution": "2560x1440",
                "type_matrix": "IPS",
                "gsync": true,
            },
            "gsync_prem": true,
            "curved": false,
            "type_display_id": 1,
        })
    );

    let reply = app.get("/getMonitor?id=1", Some(&token)).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, monitors[0]);
}

#[tokio::test]
async fn test_empty_token_is_unauthenticated() {
    let app = memory_app();
    app.token_for("alice", true).await;

    let reply = app.post("/addDisplay", Some(""), display_body()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app.post("/addDisplay", None, display_body()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app.get("/getAll", Some("not-a-token")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.error_code(), "AUTH_001");
}

#[tokio::test]
async fn test_scheme_without_token_is_missing() {
    let app = memory_app();

    for header in ["Bearer ", "Bearer"] {
        let reply = app.get("/getAll", Some(header)).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{header:?}");
        assert_eq!(reply.error_code(), "AUTH_001");
        if cfg!(debug_assertions) {
            let message = reply.body["error"]["message"].as_str().unwrap();
            assert!(message.contains("missing bearer token"), "{message}");
        }
    }
}

#[tokio::test]
async fn test_non_admin_reads_but_cannot_write() {
    let app = memory_app();
    let admin = app.token_for("alice", true).await;
    let user = app.token_for("bob", false).await;
    app.post("/addDisplay", Some(&admin), display_body()).await;
    app.post("/addMonitor", Some(&admin), monitor_body(1)).await;

    let reply = app.post("/addDisplay", Some(&user), display_body()).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.error_code(), "AUTH_002");

    let reply = app.post("/addMonitor", Some(&user), monitor_body(1)).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    assert_eq!(app.get("/getAll", Some(&user)).await.status, StatusCode::OK);
    assert_eq!(app.get("/getMonitor?id=1", Some(&user)).await.status, StatusCode::OK);

    // nothing was written by the refused calls
    let reply = app.get("/getAll", Some(&admin)).await;
    assert_eq!(reply.body["monitors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_can_do_whatever_a_reader_can() {
    let app = memory_app();
    let admin = app.token_for("alice", true).await;
    let user = app.token_for("bob", false).await;
    app.post("/addDisplay", Some(&admin), display_body()).await;
    app.post("/addMonitor", Some(&admin), monitor_body(1)).await;

    for uri in ["/getAll", "/getMonitor?id=1", "/getMonitor?id=7"] {
        let as_user = app.get(uri, Some(&user)).await;
        let as_admin = app.get(uri, Some(&admin)).await;
        assert_eq!(as_user.status, as_admin.status, "{uri}");
        assert_eq!(as_user.body, as_admin.body, "{uri}");
    }
}

#[tokio::test]
async fn test_bearer_prefix_is_optional() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;

    let reply = app.get("/getAll", Some(&format!("Bearer {token}"))).await;
    assert_eq!(reply.status, StatusCode::OK);

    // a username is never accepted in place of a token
    let reply = app.get("/getAll", Some("Bearer alice")).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gate_runs_before_body_parsing() {
    let app = memory_app();
    let user = app.token_for("bob", false).await;

    let reply = app.post_raw("/addDisplay", None, "{broken".to_string()).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app.post_raw("/addDisplay", Some(&user), "{broken".to_string()).await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app.get("/getMonitor?id=abc", None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_payloads_are_rejected() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;

    let reply = app.post_raw("/addDisplay", Some(&token), "{broken".to_string()).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_code(), "VAL_001");

    let reply = app
        .post(
            "/addDisplay",
            Some(&token),
            json!({"diag": 0, "resolution": "1920x1080", "type_matrix": "VA", "gsync": false}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .post(
            "/addDisplay",
            Some(&token),
            json!({"diag": 24, "resolution": "", "type_matrix": "VA", "gsync": false}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app
        .post(
            "/addMonitor",
            Some(&token),
            json!({"voltage": -5, "gsync_prem": false, "curved": false, "type_display_id": 1}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_monitor_requires_existing_display() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;

    let reply = app.post("/addMonitor", Some(&token), monitor_body(42)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_code(), "VAL_001");

    let reply = app.get("/getAll", Some(&token)).await;
    assert_eq!(reply.body, json!({"monitors": []}));
}

#[tokio::test]
async fn test_embedded_display_is_ignored() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;
    app.post("/addDisplay", Some(&token), display_body()).await;

    let reply = app
        .post(
            "/addMonitor",
            Some(&token),
            json!({
                "voltage": 110,
                "display": {"diag": 99, "resolution": "8K", "type_matrix": "OLED", "gsync": false},
                "gsync_prem": false,
                "curved": true,
                "type_display_id": 1,
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app.get("/getMonitor?id=1", Some(&token)).await;
    assert_eq!(reply.body["display"]["diag"], json!(27.0));
    assert_eq!(reply.body["display"]["type_matrix"], json!("IPS"));
}

#[tokio::test]
async fn test_get_monitor_errors() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;

    let reply = app.get("/getMonitor?id=9", Some(&token)).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.error_code(), "NF_001");

    let reply = app.get("/getMonitor?id=abc", Some(&token)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = app.get("/getMonitor", Some(&token)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ids_are_assigned_in_order() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;

    for expected in 1..=3 {
        let reply = app.post("/addDisplay", Some(&token), display_body()).await;
        assert_eq!(reply.body["id"], json!(expected));
    }
    for (expected, display) in [(1, 3), (2, 1)] {
        let reply = app.post("/addMonitor", Some(&token), monitor_body(display)).await;
        assert_eq!(reply.body["id"], json!(expected));
    }

    let reply = app.get("/getAll", Some(&token)).await;
    let ids: Vec<_> = reply.body["monitors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| (m["id"].clone(), m["display"]["id"].clone()))
        .collect();
    assert_eq!(ids, vec![(json!(1), json!(3)), (json!(2), json!(1))]);
}

#[tokio::test]
async fn test_creations_are_published() {
    let app = memory_app();
    let token = app.token_for("alice", true).await;
    let mut rx = app.events.subscribe();

    app.post("/addDisplay", Some(&token), display_body()).await;
    app.post("/addMonitor", Some(&token), monitor_body(1)).await;

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(first.channel, CATALOG);
    assert!(first.message.contains("display 1"));
    assert_eq!(second.channel, CATALOG);
    assert!(second.message.contains("monitor 1"));
}

#[tokio::test]
async fn test_records_persist_across_restart() {
    let dir = tempfile::tempdir().unwrap();

    let old_token = {
        let app = app_with(FlatFileStorage::new(dir.path()).unwrap());
        let token = app.token_for("alice", true).await;
        app.post("/addDisplay", Some(&token), display_body()).await;
        app.post("/addMonitor", Some(&token), monitor_body(1)).await;
        app.state.shutdown();
        token
    };
    assert!(dir.path().join("accounts.json").exists());

    let app = app_with(FlatFileStorage::new(dir.path()).unwrap());

    // a fresh process knows no tokens until someone logs in again
    let reply = app.get("/getAll", Some(&old_token)).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app.login("alice", "alice-pw").await;
    assert_eq!(reply.status, StatusCode::OK);
    let token = reply.body["token"].as_str().unwrap().to_string();
    assert_eq!(token, old_token);

    let reply = app.get("/getAll", Some(&token)).await;
    assert_eq!(reply.body["monitors"].as_array().unwrap().len(), 1);

    let reply = app.post("/addDisplay", Some(&token), display_body()).await;
    assert_eq!(reply.body, json!({"id": 2}));
}

/// Accounts work, every record operation fails with an I/O error
#[derive(Clone, Default)]
struct FailingRecords {
    accounts: MemoryStorage,
}

fn disk_error() -> StorageError {
    StorageError::Io(io::Error::other("disk on fire at /secret/path"))
}

#[async_trait]
impl AccountStore for FailingRecords {
    async fn find_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, StorageError> {
        self.accounts.find_account_by_username(username).await
    }

    async fn insert_account(&self, account: NewAccount) -> Result<Account, StorageError> {
        self.accounts.insert_account(account).await
    }
}

#[async_trait]
impl RecordStore for FailingRecords {
    async fn insert_display(&self, _display: Display) -> Result<RecordId, StorageError> {
        Err(disk_error())
    }

    async fn insert_monitor(&self, _monitor: Monitor) -> Result<RecordId, StorageError> {
        Err(disk_error())
    }

    async fn list_monitors_joined(&self) -> Result<Vec<MonitorRecord>, StorageError> {
        Err(StorageError::BrokenReference {
            monitor: 1,
            display: 9,
        })
    }

    async fn get_monitor_joined(
        &self,
        _id: RecordId,
    ) -> Result<Option<MonitorRecord>, StorageError> {
        Err(disk_error())
    }
}

#[tokio::test]
async fn test_storage_faults_are_sanitized() {
    let app = app_with(FailingRecords::default());
    let token = app.token_for("alice", true).await;
    let mut rx = app.events.subscribe();

    let replies = [
        app.post("/addDisplay", Some(&token), display_body()).await,
        app.post("/addMonitor", Some(&token), monitor_body(1)).await,
        app.get("/getAll", Some(&token)).await,
        app.get("/getMonitor?id=1", Some(&token)).await,
    ];

    for reply in &replies {
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.error_code(), "STORE_001");
        let message = reply.body["error"]["message"].as_str().unwrap();
        assert!(!message.contains("secret"));
        assert!(!message.contains("display 9"));
    }

    let event = rx.recv().await.unwrap();
    assert_eq!(event.channel, AUDIT);
    assert!(event.message.contains("insert_display"));
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = memory_app();

    let reply = app.get("/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!({"status": "ok"}));
    assert!(reply.headers.contains_key("x-request-id"));

    let reply = app.get("/getAll", None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert!(reply.headers.contains_key("x-request-id"));
}
