//! Conversation state types

use crate::tasks::{Task, TaskId};
use std::collections::BTreeMap;

// ============================================================================
// Task Inventory - snapshot of the selectable tasks
// ============================================================================

/// Selectable tasks keyed by display name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskInventory {
    tasks: BTreeMap<String, Task>,
}

impl TaskInventory {
    /// Build from a task listing, keeping tasks whose command contains
    /// `marker`. Later tasks replace earlier ones with the same name.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>, marker: &str) -> Self {
        let mut inventory = BTreeMap::new();
        for task in tasks {
            if !task.has_marker(marker) {
                continue;
            }
            let Some(name) = task.display_name().map(str::to_string) else {
                tracing::debug!(task_id = %task.id, "Skipping task without a path in its command");
                continue;
            };
            inventory.insert(name, task);
        }
        Self { tasks: inventory }
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

// ============================================================================
// Selection - the task the user picked
// ============================================================================

/// Selected task; id and name are always set together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub task_id: TaskId,
    pub task_name: String,
}

// ============================================================================
// Conversation State
// ============================================================================

/// Per-user conversation state. Session data lives inside the variants, so
/// returning to `Idle` is the terminal reset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConvState {
    /// No conversation in progress
    #[default]
    Idle,

    /// Task menu shown, waiting for a task name
    AwaitingTaskSelection { inventory: TaskInventory },

    /// Action menu shown for the selected task
    AwaitingActionSelection {
        inventory: TaskInventory,
        selection: Selection,
    },
}

impl ConvState {
    #[allow(dead_code)] // State query utility
    pub fn is_idle(&self) -> bool {
        matches!(self, ConvState::Idle)
    }

    pub fn inventory(&self) -> Option<&TaskInventory> {
        match self {
            ConvState::Idle => None,
            ConvState::AwaitingTaskSelection { inventory }
            | ConvState::AwaitingActionSelection { inventory, .. } => Some(inventory),
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            ConvState::AwaitingActionSelection { selection, .. } => Some(selection),
            _ => None,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingTaskSelection { .. } => "awaiting_task_selection",
            ConvState::AwaitingActionSelection { .. } => "awaiting_action_selection",
        }
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    /// Substring marking a task as selectable
    pub bot_marker: String,
}

impl ConvContext {
    pub fn new(bot_marker: impl Into<String>) -> Self {
        Self {
            bot_marker: bot_marker.into(),
        }
    }
}
