//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use hwcatalog_backend_lib::{
    config::{HashingSettings, Settings},
    create_router,
    events::BroadcastPublisher,
    storage::{MemoryStorage, Storage},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Settings with a cheap scrypt cost so tests stay fast
pub fn test_settings() -> Settings {
    Settings {
        hashing: HashingSettings { log_n: 4, r: 8, p: 1 },
        ..Settings::default()
    }
}

pub struct TestApp<S> {
    pub router: Router,
    pub state: Arc<AppState<S>>,
    pub events: BroadcastPublisher,
}

pub fn app_with<S: Storage>(storage: S) -> TestApp<S> {
    let events = BroadcastPublisher::new(64);
    let state = Arc::new(
        AppState::new(storage, test_settings(), Arc::new(events.clone())).unwrap(),
    );
    TestApp {
        router: create_router(Arc::clone(&state)),
        state,
        events,
    }
}

pub fn memory_app() -> TestApp<MemoryStorage> {
    app_with(MemoryStorage::new())
}

/// Status, headers and JSON body (Null when the body is empty)
pub struct Reply {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl Reply {
    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}

impl<S: Storage> TestApp<S> {
    pub async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        Reply {
            status,
            headers,
            body,
        }
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Reply {
        self.post_raw(uri, token, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, token: Option<&str>, body: String) -> Reply {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn register(&self, username: &str, password: &str, is_admin: bool) -> Reply {
        self.post(
            "/register",
            None,
            json!({
                "username": username,
                "password": password,
                "email": format!("{username}@x.com"),
                "is_admin": is_admin,
            }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Reply {
        self.post(
            "/auth",
            None,
            json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Register and log in, returning the token
    pub async fn token_for(&self, username: &str, is_admin: bool) -> String {
        let password = format!("{username}-pw");
        assert_eq!(
            self.register(username, &password, is_admin).await.status,
            StatusCode::OK
        );
        let reply = self.login(username, &password).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.body["token"].as_str().unwrap().to_string()
    }
}

pub fn display_body() -> Value {
    json!({ "diag": 27, "res": "2560x1440", "matrix": "IPS", "gsync": true })
}

pub fn monitor_body(display_id: i64) -> Value {
    json!({ "voltage": 220, "gsync_prem": true, "curved": false, "display_id": display_id })
}
