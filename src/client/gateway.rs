//! Transport between the client and the Task API.
//!
//! [`TaskGateway`] is the seam the client cache talks through;
//! [`HttpTaskGateway`] is the reqwest implementation.

use std::env;

use async_trait::async_trait;
use reqwest::Response;

use super::error::ClientError;
use crate::api::{ApiError, CreateTaskRequest, SetCompletionRequest, TaskResponse, UpdateTaskRequest};
use crate::domain::{Task, TaskId};

/// Default API address, matching the server's default port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

// =============================================================================
// Client Configuration
// =============================================================================

/// Where the client finds the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address without a trailing slash.
    pub base_url: String,
}

impl ClientConfig {
    /// Creates a configuration for the given base address.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Reads `TASK_API_URL`, falling back to [`DEFAULT_BASE_URL`] when it is
    /// unset or blank.
    #[must_use]
    pub fn from_env() -> Self {
        env::var("TASK_API_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(Self::default, Self::new)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// =============================================================================
// Gateway Trait
// =============================================================================

/// Request/response operations against the Task API.
///
/// Each call resolves exactly once, with the server's record on success.
/// Calls carry no timeout and cannot be cancelled.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// `GET /tasks`
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError>;

    /// `POST /tasks`
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError>;

    /// `PUT /tasks/{id}`
    async fn set_completion(&self, id: TaskId, completed: bool) -> Result<Task, ClientError>;

    /// `PATCH /tasks/{id}`
    async fn update_task(
        &self,
        id: TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<Task, ClientError>;

    /// `DELETE /tasks/{id}`
    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError>;
}

// =============================================================================
// HTTP Gateway
// =============================================================================

/// reqwest-based [`TaskGateway`].
#[derive(Debug, Clone)]
pub struct HttpTaskGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskGateway {
    /// Creates a gateway for the configured API address.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url,
        }
    }

    /// Returns the API base address.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{id}", self.base_url)
    }
}

/// Turns a non-success response into a [`ClientError`], reading the error
/// body when there is one.
async fn reject(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.json::<ApiError>().await.ok();
    ClientError::from_response(status, body)
}

async fn read_task(response: Response) -> Result<Task, ClientError> {
    if !response.status().is_success() {
        return Err(reject(response).await);
    }
    let task: TaskResponse = response.json().await?;
    Ok(task.into())
}

fn log_transport(operation: &'static str) -> impl FnOnce(reqwest::Error) -> ClientError {
    move |error| {
        tracing::warn!(%error, operation, "Task API request failed");
        ClientError::from(error)
    }
}

#[async_trait]
impl TaskGateway for HttpTaskGateway {
    async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        let response = self
            .client
            .get(self.tasks_url())
            .send()
            .await
            .map_err(log_transport("list"))?;
        if !response.status().is_success() {
            return Err(reject(response).await);
        }
        let tasks: Vec<TaskResponse> = response.json().await?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ClientError> {
        let response = self
            .client
            .post(self.tasks_url())
            .json(request)
            .send()
            .await
            .map_err(log_transport("create"))?;
        read_task(response).await
    }

    async fn set_completion(&self, id: TaskId, completed: bool) -> Result<Task, ClientError> {
        let response = self
            .client
            .put(self.task_url(id))
            .json(&SetCompletionRequest { completed })
            .send()
            .await
            .map_err(log_transport("set_completion"))?;
        read_task(response).await
    }

    async fn update_task(
        &self,
        id: TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<Task, ClientError> {
        let response = self
            .client
            .patch(self.task_url(id))
            .json(request)
            .send()
            .await
            .map_err(log_transport("update"))?;
        read_task(response).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.task_url(id))
            .send()
            .await
            .map_err(log_transport("delete"))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(reject(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:3001", "http://localhost:3001")]
    #[case("http://localhost:3001/", "http://localhost:3001")]
    #[case("  http://api.test//  ", "http://api.test")]
    fn test_client_config_normalizes_base_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(ClientConfig::new(input).base_url, expected);
    }

    #[rstest]
    fn test_default_base_url() {
        assert_eq!(ClientConfig::default().base_url, DEFAULT_BASE_URL);
    }

    #[rstest]
    fn test_gateway_urls() {
        let gateway = HttpTaskGateway::new(ClientConfig::new("http://api.test/"));
        assert_eq!(gateway.base_url(), "http://api.test");
        assert_eq!(gateway.tasks_url(), "http://api.test/tasks");
        assert_eq!(gateway.task_url(TaskId::new(12)), "http://api.test/tasks/12");
    }
}
