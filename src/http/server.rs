//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatch handler
//! - Wire up middleware (tracing, request ID, timeout)
//! - Bind server to listener, shut down gracefully
//! - Dispatch requests through the task route table
//! - Observability (metrics, correlation IDs)

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{
        rejection::{BytesRejection, FailedToBufferBody},
        DefaultBodyLimit, FromRequest, State,
    },
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::request::{query_params, request_id, RequestContext};
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::store::Database;
use crate::tasks::{self, Handler};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Database>>,
    pub routes: Arc<RouteTable<Handler>>,
}

impl AppState {
    pub fn new(database: Database) -> Self {
        let routes = tasks::routes();
        for route in routes.routes() {
            tracing::debug!(method = %route.method, template = %route.template, "Route registered");
        }

        Self {
            store: Arc::new(Mutex::new(database)),
            routes: Arc::new(routes),
        }
    }

    /// Lock the record store.
    pub fn store(&self) -> MutexGuard<'_, Database> {
        self.store.lock().expect("store mutex poisoned")
    }
}

/// HTTP server for the task API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `database`.
    pub fn new(config: ServerConfig, database: Database) -> Self {
        let state = AppState::new(database);
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(DefaultBodyLimit::max(config.limits.max_body_bytes))
                    .layer(TraceLayer::new_for_http())
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all handler.
/// Looks up the route, buffers the body and runs the matched task handler.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching request"
    );

    // 1. Match Route
    let (handler, template, params) = match state.routes.match_request(&method, &path) {
        Some(found) => (
            found.route.handler,
            found.route.template.to_string(),
            found.params,
        ),
        None => {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(method.as_str(), metrics::UNMATCHED_ROUTE, 404, start_time);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    // 2. Buffer Request Body
    let query = query_params(request.uri());
    let body = match Bytes::from_request(request, &state).await {
        Ok(bytes) => bytes,
        Err(rejection) => {
            tracing::warn!(request_id = %request_id, error = %rejection, "Failed to read request body");
            let response = body_error(rejection).into_response();
            metrics::record_request(method.as_str(), &template, response.status().as_u16(), start_time);
            return response;
        }
    };

    let ctx = RequestContext {
        request_id: request_id.clone(),
        params,
        query,
        body,
    };

    // 3. Run Handler
    let handler_state = state.clone();
    let response = match tokio::task::spawn_blocking(move || handler(&handler_state, ctx)).await {
        Ok(result) => result.into_response(),
        Err(e) => ApiError::Internal(format!("handler task failed: {e}")).into_response(),
    };

    let status = response.status();
    metrics::record_request(method.as_str(), &template, status.as_u16(), start_time);
    tracing::debug!(
        request_id = %request_id,
        route = %template,
        status = %status,
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Request handled"
    );

    response
}

fn body_error(rejection: BytesRejection) -> ApiError {
    match rejection {
        BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
            ApiError::PayloadTooLarge
        }
        _ => ApiError::BodyRead,
    }
}
