//! Route handlers for the `tasks` collection.
//!
//! Handlers run on the blocking pool: each one locks the store, performs its
//! store call(s) (including the file write) and builds the response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use super::model::{timestamp_now, Task, TaskPayload, SEARCHABLE_FIELDS};
use super::COLLECTION;
use crate::http::request::RequestContext;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::store::{Filter, Record};

/// `GET /tasks[?search=...]`
pub fn list(state: &AppState, ctx: RequestContext) -> Result<Response, ApiError> {
    let filter = ctx
        .query("search")
        .filter(|search| !search.is_empty())
        .map(search_filter);

    let tasks = state.store().select(COLLECTION, filter.as_ref());

    tracing::debug!(
        request_id = %ctx.request_id,
        filtered = filter.is_some(),
        count = tasks.len(),
        "Listed tasks"
    );
    Ok(Json(tasks).into_response())
}

/// `POST /tasks`
pub fn create(state: &AppState, ctx: RequestContext) -> Result<Response, ApiError> {
    let payload: TaskPayload = ctx.json_body()?;
    let (title, description) = payload.required_fields()?;

    let task = Task::new(
        title.clone(),
        description.clone(),
        payload.completed_at.clone(),
    );
    let id = task.id.clone();
    state.store().insert(COLLECTION, task.into())?;

    tracing::info!(request_id = %ctx.request_id, task_id = %id, "Task created");
    Ok(StatusCode::CREATED.into_response())
}

/// `PUT /tasks/:id`
///
/// An unknown id is not an error: nothing is written and 204 is returned.
pub fn update(state: &AppState, ctx: RequestContext) -> Result<Response, ApiError> {
    let id = task_id(&ctx)?;
    let payload: TaskPayload = ctx.json_body()?;
    let (title, description) = payload.required_fields()?;

    let mut fields = Record::new();
    fields.insert("title".into(), title.clone());
    fields.insert("description".into(), description.clone());
    if let Some(completed_at) = &payload.completed_at {
        fields.insert("completed_at".into(), completed_at.clone());
    }
    if let Some(created_at) = &payload.created_at {
        fields.insert("created_at".into(), created_at.clone());
    }
    fields.insert("updated_at".into(), Value::String(timestamp_now()));

    let found = state.store().update(COLLECTION, id, fields)?;
    if found {
        tracing::info!(request_id = %ctx.request_id, task_id = %id, "Task updated");
    } else {
        tracing::debug!(request_id = %ctx.request_id, task_id = %id, "Update target not found, ignoring");
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `DELETE /tasks/:id`
pub fn delete(state: &AppState, ctx: RequestContext) -> Result<Response, ApiError> {
    let id = task_id(&ctx)?;
    let mut store = state.store();

    if store.index_of(COLLECTION, id).is_none() {
        return Err(ApiError::RecordNotFound);
    }
    store.delete(COLLECTION, id)?;

    tracing::info!(request_id = %ctx.request_id, task_id = %id, "Task deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// `PATCH /tasks/:id/complete`
///
/// Unknown ids answer 404 with an empty body.
pub fn complete(state: &AppState, ctx: RequestContext) -> Result<Response, ApiError> {
    let id = task_id(&ctx)?;
    let mut store = state.store();

    let Some(mut task) = store
        .index_of(COLLECTION, id)
        .and_then(|index| store.get(COLLECTION, index))
        .cloned()
    else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let now = timestamp_now();
    task.insert("completed_at".into(), Value::String(now.clone()));
    task.insert("updated_at".into(), Value::String(now));
    store.update(COLLECTION, id, task)?;

    tracing::info!(request_id = %ctx.request_id, task_id = %id, "Task completed");
    Ok(StatusCode::NO_CONTENT.into_response())
}

fn task_id(ctx: &RequestContext) -> Result<&str, ApiError> {
    ctx.param("id")
        .ok_or_else(|| ApiError::Internal("route is missing the :id parameter".into()))
}

fn search_filter(search: &str) -> Filter {
    SEARCHABLE_FIELDS
        .iter()
        .map(|field| (field.to_string(), search.to_string()))
        .collect()
}
