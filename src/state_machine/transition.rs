//! Pure state transition function
//!
//! Given the current state and an event, decides the next state and the
//! effects the runtime must carry out. No I/O happens here.

use super::state::{Selection, TaskInventory};
use super::{ConvContext, ConvState, Effect, Event, Keyboard, Reply};
use crate::tasks::RestartOutcome;
use thiserror::Error;

pub const CANCEL: &str = "Cancel";
pub const RESTART: &str = "Restart";
pub const UPLOAD: &str = "Upload";

pub const WAIT_MESSAGE: &str = "Wait, we are getting your bot list from the server.";
pub const SELECT_TASK_MESSAGE: &str = "Select a bot from the list";
pub const NO_TASKS_MESSAGE: &str = "There are no bots running";
pub const SELECT_ACTION_MESSAGE: &str = "Select an option";
pub const INVALID_SELECTION_MESSAGE: &str = "Something wrong sent";
pub const NO_REPOSITORY_MESSAGE: &str = "There's not a repository set for this bot";
pub const CANCELLED_MESSAGE: &str = "OK";
pub const NOT_ALLOWED_MESSAGE: &str = "User not allowed";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("event {event} is not expected in state {state}")]
    UnexpectedEvent {
        state: &'static str,
        event: &'static str,
    },
}

fn action_keyboard() -> Keyboard {
    Keyboard::Options(vec![
        vec![RESTART.to_string(), UPLOAD.to_string()],
        vec![CANCEL.to_string()],
    ])
}

fn reset_with(text: impl Into<String>) -> TransitionResult {
    TransitionResult::new(ConvState::Idle).with_effect(Effect::final_reply(text))
}

/// Pure transition function
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Entry and cancellation (valid in every state)
        // ============================================================

        // Entry command always starts a fresh listing
        (_, Event::EntryCommand) => Ok(TransitionResult::new(ConvState::Idle)
            .with_effect(Effect::Notice(Reply::new(WAIT_MESSAGE, Keyboard::Keep)))
            .with_effect(Effect::ListTasks)),

        (_, Event::UserText { text }) if text == CANCEL => Ok(reset_with(CANCELLED_MESSAGE)),

        // ============================================================
        // Listing
        // ============================================================
        (ConvState::Idle, Event::TasksListed { tasks }) => {
            let inventory =
                TaskInventory::from_tasks(tasks.unwrap_or_default(), &context.bot_marker);
            if inventory.is_empty() {
                return Ok(reset_with(NO_TASKS_MESSAGE));
            }
            let keyboard = Keyboard::column(inventory.names());
            Ok(
                TransitionResult::new(ConvState::AwaitingTaskSelection { inventory })
                    .with_effect(Effect::DismissNotice)
                    .with_effect(Effect::reply_with_options(SELECT_TASK_MESSAGE, keyboard)),
            )
        }

        (ConvState::Idle, Event::UserText { .. }) => Ok(reset_with(NOT_ALLOWED_MESSAGE)),

        // ============================================================
        // Task selection
        // ============================================================
        (ConvState::AwaitingTaskSelection { inventory }, Event::UserText { text }) => {
            let Some(task) = inventory.get(&text) else {
                return Ok(reset_with(INVALID_SELECTION_MESSAGE));
            };
            let selection = Selection {
                task_id: task.id,
                task_name: text,
            };
            tracing::info!(task_id = %selection.task_id, task = %selection.task_name, "Task selected");
            Ok(TransitionResult::new(ConvState::AwaitingActionSelection {
                inventory: inventory.clone(),
                selection,
            })
            .with_effect(Effect::reply_with_options(
                SELECT_ACTION_MESSAGE,
                action_keyboard(),
            )))
        }

        // ============================================================
        // Action selection
        // ============================================================
        (ConvState::AwaitingActionSelection { selection, .. }, Event::UserText { text })
            if text == RESTART =>
        {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::RestartTask {
                task_id: selection.task_id,
            }))
        }

        (ConvState::AwaitingActionSelection { selection, .. }, Event::RestartCompleted { outcome }) => {
            let text = match outcome {
                RestartOutcome::Restarted => {
                    format!("[{}] {} restarted.", selection.task_id, selection.task_name)
                }
                RestartOutcome::Failed => format!(
                    "Something went wrong when trying to restart {}.",
                    selection.task_name
                ),
            };
            Ok(reset_with(text))
        }

        (ConvState::AwaitingActionSelection { inventory, selection }, Event::UserText { text })
            if text == UPLOAD =>
        {
            let dir = inventory
                .get(&selection.task_name)
                .and_then(crate::tasks::Task::repository_dir);
            tracing::info!(task = %selection.task_name, dir = ?dir, "Repository directory resolved");
            match dir {
                Some(dir) => Ok(
                    TransitionResult::new(state.clone()).with_effect(Effect::PullRepository { dir })
                ),
                None => Ok(reset_with(NO_REPOSITORY_MESSAGE)),
            }
        }

        (ConvState::AwaitingActionSelection { .. }, Event::PullCompleted { output }) => {
            Ok(reset_with(output.0))
        }

        // Anything else is refused; the selection stays for a later action
        (ConvState::AwaitingActionSelection { .. }, Event::UserText { .. }) => Ok(
            TransitionResult::new(state.clone())
                .with_effect(Effect::final_reply(NOT_ALLOWED_MESSAGE)),
        ),

        // ============================================================
        // Stale results
        // ============================================================
        (state, event) => Err(TransitionError::UnexpectedEvent {
            state: state.name(),
            event: event.name(),
        }),
    }
}
