//! Task API.
//!
//! # Routes
//! ```text
//! GET    /tasks[?search=s]      → 200 JSON array
//! POST   /tasks                 → 201 | 400
//! PUT    /tasks/:id             → 204 | 400 (unknown id: silent 204)
//! DELETE /tasks/:id             → 204 | 404 {message}
//! PATCH  /tasks/:id/complete    → 204 | 404
//! ```
//!
//! # Design Decisions
//! - Title is validated before description
//! - ids, created_at, updated_at and completion times are server-generated

pub mod handlers;
pub mod model;

use axum::http::Method;
use axum::response::Response;

use crate::http::request::RequestContext;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::routing::RouteTable;

pub use model::{Task, TaskPayload};

/// Name of the store collection holding tasks.
pub const COLLECTION: &str = "tasks";

/// Signature shared by every route handler.
pub type Handler = fn(&AppState, RequestContext) -> Result<Response, ApiError>;

/// The task route table, in matching order.
pub fn routes() -> RouteTable<Handler> {
    RouteTable::<Handler>::new()
        .route(Method::GET, "/tasks", handlers::list)
        .route(Method::POST, "/tasks", handlers::create)
        .route(Method::PUT, "/tasks/:id", handlers::update)
        .route(Method::DELETE, "/tasks/:id", handlers::delete)
        .route(Method::PATCH, "/tasks/:id/complete", handlers::complete)
}
