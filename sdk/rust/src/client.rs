use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// A task as returned by `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body for creating or replacing a task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl NewTask {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            completed_at: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport or decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("task service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

pub struct TasksClient {
    client: Client,
    base_url: String,
}

impl TasksClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Use a preconfigured reqwest client (proxies, timeouts, ...).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// List tasks, optionally filtered by `search`.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Task>, ClientError> {
        let mut req = self.client.get(self.url("/tasks"));
        if let Some(search) = search {
            req = req.query(&[("search", search)]);
        }
        let resp = check(req.send().await?).await?;
        Ok(resp.json().await?)
    }

    /// Create a task. The service does not return it; use `list` to read it back.
    pub async fn create(&self, task: &NewTask) -> Result<(), ClientError> {
        let resp = self.client.post(self.url("/tasks")).json(task).send().await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn update(&self, id: &str, task: &NewTask) -> Result<(), ClientError> {
        let resp = self
            .client
            .put(self.url(&format!("/tasks/{id}")))
            .json(task)
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .delete(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    pub async fn complete(&self, id: &str) -> Result<(), ClientError> {
        let resp = self
            .client
            .patch(self.url(&format!("/tasks/{id}/complete")))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}
