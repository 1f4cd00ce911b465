//! HTTP client for the always-on task endpoints

use super::{RestartOutcome, Task, TaskApiError, TaskClient, TaskId};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Default API root of the hosting platform
pub const DEFAULT_API_BASE: &str = "https://www.pythonanywhere.com/api/v0/user";

/// Connection settings for the task service
#[derive(Debug, Clone)]
pub struct TaskServiceConfig {
    pub base_url: String,
    pub token: String,
}

/// Task service client over HTTP
pub struct HttpTaskClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTaskClient {
    pub fn new(config: &TaskServiceConfig) -> Result<Self, TaskApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn tasks_url(&self, account: &str) -> String {
        format!("{}/{account}/always_on/", self.base_url)
    }

    fn restart_url(&self, account: &str, task_id: TaskId) -> String {
        format!("{}/{account}/always_on/{task_id}/restart/", self.base_url)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    async fn fetch_tasks(&self, account: &str) -> Result<Vec<Task>, TaskApiError> {
        let response = self
            .client
            .get(self.tasks_url(account))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TaskApiError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn post_restart(&self, account: &str, task_id: TaskId) -> Result<(), TaskApiError> {
        let response = self
            .client
            .post(self.restart_url(account, task_id))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            status => Err(TaskApiError::Status(status)),
        }
    }
}

#[async_trait]
impl TaskClient for HttpTaskClient {
    async fn list_tasks(&self, account: &str) -> Option<Vec<Task>> {
        match self.fetch_tasks(account).await {
            Ok(tasks) => Some(tasks),
            Err(e) => {
                tracing::warn!(account = %account, error = %e, "Could not list tasks");
                None
            }
        }
    }

    async fn restart_task(&self, account: &str, task_id: TaskId) -> RestartOutcome {
        match self.post_restart(account, task_id).await {
            Ok(()) => RestartOutcome::Restarted,
            Err(e) => {
                tracing::warn!(account = %account, task_id = %task_id, error = %e, "Could not restart task");
                RestartOutcome::Failed
            }
        }
    }
}
