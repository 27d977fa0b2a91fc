//! Task record shape, request payload and server-side field generators.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::http::response::ApiError;
use crate::store::Record;

/// Layout of every server-generated timestamp (`dd/MM/yyyy HH:mm:ss`).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Fields matched by the `search` query parameter.
pub const SEARCHABLE_FIELDS: [&str; 5] = [
    "title",
    "description",
    "completed_at",
    "created_at",
    "updated_at",
];

/// A stored task.
///
/// `title`, `description` and `completed_at` hold whatever JSON the client
/// sent; only their presence is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: Value,
    pub description: Value,
    pub completed_at: Option<Value>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Task {
    /// A new task with a fresh id and `created_at` set to now.
    pub fn new(title: Value, description: Value, completed_at: Option<Value>) -> Self {
        Self {
            id: new_id(),
            title,
            description,
            completed_at,
            created_at: timestamp_now(),
            updated_at: None,
        }
    }
}

impl From<Task> for Record {
    fn from(task: Task) -> Self {
        let mut record = Record::new();
        record.insert("id".into(), Value::String(task.id));
        record.insert("title".into(), task.title);
        record.insert("description".into(), task.description);
        record.insert("completed_at".into(), task.completed_at.unwrap_or(Value::Null));
        record.insert("created_at".into(), Value::String(task.created_at));
        record.insert(
            "updated_at".into(),
            task.updated_at.map_or(Value::Null, Value::String),
        );
        record
    }
}

/// Body accepted by `POST /tasks` and `PUT /tasks/:id`.
///
/// An explicit `null` reads the same as an absent field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub completed_at: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
}

impl TaskPayload {
    /// Title and description, checked in that order.
    pub fn required_fields(&self) -> Result<(&Value, &Value), ApiError> {
        let title = required(&self.title, "title")?;
        let description = required(&self.description, "description")?;
        Ok((title, description))
    }
}

fn required<'a>(value: &'a Option<Value>, field: &'static str) -> Result<&'a Value, ApiError> {
    value
        .as_ref()
        .filter(|v| is_truthy(v))
        .ok_or(ApiError::MissingField(field))
}

/// `false`, `0`, `""` and `null` are falsy; every other value is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// A random v4 UUID, hyphenated.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use serde_json::json;

    #[test]
    fn test_timestamp_layout() {
        let now = timestamp_now();
        assert_eq!(now.len(), "16/10/2026 09:05:03".len());
        assert!(NaiveDateTime::parse_from_str(&now, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_new_task() {
        let task = Task::new("title".into(), "description".into(), None);
        assert!(Uuid::parse_str(&task.id).is_ok());
        assert!(task.updated_at.is_none());

        let other = Task::new("title".into(), "description".into(), None);
        assert_ne!(task.id, other.id);
    }

    #[test]
    fn test_record_conversion() {
        let task = Task::new("a".into(), "b".into(), Some("01/01/2026 00:00:00".into()));
        let id = task.id.clone();
        let record: Record = task.into();

        assert_eq!(record["id"], Value::String(id));
        assert_eq!(record["completed_at"], Value::String("01/01/2026 00:00:00".into()));
        assert_eq!(record["updated_at"], Value::Null);
        assert_eq!(record.len(), 6);
    }

    #[test]
    fn test_required_fields_order() {
        let payload = TaskPayload::default();
        assert!(matches!(
            payload.required_fields(),
            Err(ApiError::MissingField("title"))
        ));

        let payload = TaskPayload {
            title: Some("t".into()),
            description: Some("".into()),
            ..Default::default()
        };
        assert!(matches!(
            payload.required_fields(),
            Err(ApiError::MissingField("description"))
        ));

        let payload = TaskPayload {
            title: Some("t".into()),
            description: Some("d".into()),
            ..Default::default()
        };
        let (title, description) = payload.required_fields().unwrap();
        assert_eq!(title, "t");
        assert_eq!(description, "d");
    }

    #[test]
    fn test_required_fields_use_truthiness() {
        for falsy in [json!(false), json!(0), json!(0.0), json!("")] {
            let payload = TaskPayload {
                title: Some(falsy.clone()),
                description: Some("d".into()),
                ..Default::default()
            };
            assert!(
                matches!(payload.required_fields(), Err(ApiError::MissingField("title"))),
                "{falsy} should be missing"
            );
        }

        for truthy in [json!(1), json!(true), json!([]), json!({}), json!("0")] {
            let payload = TaskPayload {
                title: Some(truthy.clone()),
                description: Some(truthy.clone()),
                ..Default::default()
            };
            let (title, _) = payload.required_fields().unwrap();
            assert_eq!(title, &truthy);
        }
    }
}
