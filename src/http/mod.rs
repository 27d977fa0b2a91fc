//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all dispatch)
//!     → request.rs (request ID, query decoding, buffered body)
//!     → routing (route table picks the task handler)
//!     → response.rs (error mapping, {message} bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestContext, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{AppState, HttpServer};
