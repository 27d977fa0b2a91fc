//! Shared utilities for endpoint and end-to-end tests.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tasks_server::config::ServerConfig;
use tasks_server::http::{AppState, HttpServer};
use tasks_server::lifecycle::Shutdown;
use tasks_server::store::Database;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// A buffered response.
#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

/// Router over an in-memory store.
#[allow(dead_code)]
pub fn memory_router() -> Router {
    router_for(Database::in_memory(), ServerConfig::default())
}

/// Router over a store backed by `path`.
#[allow(dead_code)]
pub fn file_router(path: &Path) -> Router {
    router_for(Database::open(path).unwrap(), ServerConfig::default())
}

#[allow(dead_code)]
pub fn router_for(database: Database, config: ServerConfig) -> Router {
    let state = AppState::new(database);
    HttpServer::build_router(&config, state)
}

/// Send one request through `router`. `body` is sent verbatim when given.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// GET /tasks, returning the decoded array.
#[allow(dead_code)]
pub async fn list_tasks(router: &Router, query: &str) -> Vec<Value> {
    let response = send(router, Method::GET, &format!("/tasks{query}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    response.json().as_array().cloned().unwrap()
}

/// POST a task and return its stored id (looked up by title).
#[allow(dead_code)]
pub async fn create_task(router: &Router, title: &str, description: &str) -> String {
    let body = serde_json::json!({ "title": title, "description": description }).to_string();
    let response = send(router, Method::POST, "/tasks", Some(&body)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    list_tasks(router, "")
        .await
        .into_iter()
        .rev()
        .find(|task| task["title"] == title)
        .and_then(|task| task["id"].as_str().map(str::to_string))
        .expect("created task not listed")
}

/// Start a real server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(store_path: &Path) -> (SocketAddr, Shutdown) {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.path = store_path.display().to_string();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Database::open(store_path).unwrap());
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// SDK client for a server started with [`start_server`].
#[allow(dead_code)]
pub fn sdk_client(addr: SocketAddr) -> tasks_sdk::TasksClient {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    tasks_sdk::TasksClient::with_client(client, &format!("http://{}", addr))
}
