//! Events that can occur in a conversation

use crate::repo::PullOutput;
use crate::tasks::{RestartOutcome, Task};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    /// The `/bots` entry command (access already checked)
    EntryCommand,
    UserText {
        text: String,
    },

    // Task service events
    TasksListed {
        tasks: Option<Vec<Task>>,
    },
    RestartCompleted {
        outcome: RestartOutcome,
    },

    // Repository events
    PullCompleted {
        output: PullOutput,
    },
}

impl Event {
    #[allow(dead_code)] // Constructor for tests
    pub fn user_text(text: impl Into<String>) -> Self {
        Event::UserText { text: text.into() }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Event::EntryCommand => "entry_command",
            Event::UserText { .. } => "user_text",
            Event::TasksListed { .. } => "tasks_listed",
            Event::RestartCompleted { .. } => "restart_completed",
            Event::PullCompleted { .. } => "pull_completed",
        }
    }
}
