//! Request handling and transformation.
//!
//! # Responsibilities
//! - Read the request ID assigned by the middleware stack
//! - Decode query parameters
//! - Carry path parameters and the buffered body to route handlers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body is buffered (bounded) before the handler runs
//! - An empty body reads as an empty JSON object

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::response::ApiError;
use crate::routing::PathParams;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Extract the request ID, or `"unknown"` if none was assigned.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Decode the query string of `uri` into a map.
///
/// Values are percent-decoded. A malformed query yields an empty map.
pub fn query_params(uri: &Uri) -> HashMap<String, String> {
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .map(|Query(params)| params)
        .unwrap_or_default()
}

/// Everything a route handler needs from the incoming request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: String,
    pub params: PathParams,
    pub query: HashMap<String, String>,
    pub body: Bytes,
}

impl RequestContext {
    /// Path parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Query parameter by name.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Deserialize the body as a JSON object.
    ///
    /// Empty or whitespace-only bodies read as `{}`. Anything that is not a
    /// JSON object, or does not fit `T`, is rejected as an invalid body.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let value = if self.body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(&self.body).map_err(|_| ApiError::InvalidBody)?
        };

        if !value.is_object() {
            return Err(ApiError::InvalidBody);
        }
        serde_json::from_value(value).map_err(|_| ApiError::InvalidBody)
    }
}
