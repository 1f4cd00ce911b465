//! Task records returned by the hosting API

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identifier of an always-on task, unique within an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An always-on task. Fields other than `id` and `command` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub command: String,
}

impl Task {
    #[allow(dead_code)] // Tasks normally come from the API; used by tests
    pub fn new(id: i64, command: impl Into<String>) -> Self {
        Self {
            id: TaskId(id),
            command: command.into(),
        }
    }

    /// Whether the command carries `marker`, making the task selectable
    pub fn has_marker(&self, marker: &str) -> bool {
        self.command.contains(marker)
    }

    /// Path segment preceding the last one, e.g. `fooBot` for
    /// `python3 /home/me/fooBot/app.py`.
    pub fn display_name(&self) -> Option<&str> {
        self.command.rsplit('/').nth(1)
    }

    /// Directory holding the task's repository: the command from its first
    /// `/`, without the final path segment.
    pub fn repository_dir(&self) -> Option<PathBuf> {
        let start = self.command.find('/')?;
        let path = self.command.get(start..)?;
        let (dir, _) = path.rsplit_once('/')?;
        if dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(dir))
        }
    }
}

/// Result of a restart request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    Restarted,
    Failed,
}
