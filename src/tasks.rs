//! Always-on task service abstraction
//!
//! Lists the tasks of an account and restarts them through the hosting
//! platform's API.

mod client;
mod error;
mod types;

pub use client::{HttpTaskClient, TaskServiceConfig, DEFAULT_API_BASE};
pub use error::TaskApiError;
pub use types::{RestartOutcome, Task, TaskId};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for the remote task service
#[async_trait]
pub trait TaskClient: Send + Sync {
    /// List the always-on tasks of `account`.
    ///
    /// `None` means the service gave no usable answer (non-200 status,
    /// transport failure or a body that is not a task list).
    async fn list_tasks(&self, account: &str) -> Option<Vec<Task>>;

    /// Restart a single task. Never retried.
    async fn restart_task(&self, account: &str, task_id: TaskId) -> RestartOutcome;
}

#[async_trait]
impl<T: TaskClient + ?Sized> TaskClient for Arc<T> {
    async fn list_tasks(&self, account: &str) -> Option<Vec<Task>> {
        (**self).list_tasks(account).await
    }

    async fn restart_task(&self, account: &str, task_id: TaskId) -> RestartOutcome {
        (**self).restart_task(account, task_id).await
    }
}

/// Logging wrapper for task clients
pub struct LoggingTaskClient<T> {
    inner: T,
}

impl<T: TaskClient> LoggingTaskClient<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: TaskClient> TaskClient for LoggingTaskClient<T> {
    async fn list_tasks(&self, account: &str) -> Option<Vec<Task>> {
        let start = std::time::Instant::now();
        let result = self.inner.list_tasks(account).await;
        let duration = start.elapsed();

        match &result {
            Some(tasks) => {
                tracing::info!(
                    account = %account,
                    duration_ms = %duration.as_millis(),
                    count = tasks.len(),
                    "Task list fetched"
                );
            }
            None => {
                tracing::warn!(
                    account = %account,
                    duration_ms = %duration.as_millis(),
                    "Task list unavailable"
                );
            }
        }

        result
    }

    async fn restart_task(&self, account: &str, task_id: TaskId) -> RestartOutcome {
        let start = std::time::Instant::now();
        let outcome = self.inner.restart_task(account, task_id).await;
        let duration = start.elapsed();

        match outcome {
            RestartOutcome::Restarted => tracing::info!(
                account = %account,
                task_id = %task_id,
                duration_ms = %duration.as_millis(),
                "Task restarted"
            ),
            RestartOutcome::Failed => tracing::warn!(
                account = %account,
                task_id = %task_id,
                duration_ms = %duration.as_millis(),
                "Task restart failed"
            ),
        }

        outcome
    }
}
