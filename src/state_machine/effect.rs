//! Effects produced by state transitions

use crate::tasks::TaskId;
use std::path::PathBuf;

/// Reply keyboard attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Keyboard {
    /// Leave whatever keyboard the client shows
    #[default]
    Keep,
    /// Hide the reply keyboard
    Remove,
    /// Offer these buttons, one inner vec per row
    Options(Vec<Vec<String>>),
}

impl Keyboard {
    /// One button per row
    pub fn column<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        Keyboard::Options(labels.into_iter().map(|l| vec![l.to_string()]).collect())
    }
}

/// Outgoing chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a message to the user
    Reply(Reply),

    /// Send a placeholder message that a later `DismissNotice` removes
    Notice(Reply),

    /// Delete the placeholder sent while handling the current message
    DismissNotice,

    /// Fetch the task list; answered with `Event::TasksListed`
    ListTasks,

    /// Restart a task; answered with `Event::RestartCompleted`
    RestartTask { task_id: TaskId },

    /// Pull the repository in `dir`; answered with `Event::PullCompleted`
    PullRepository { dir: PathBuf },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply(Reply::new(text, Keyboard::Keep))
    }

    /// Final message of a conversation, hides the keyboard
    pub fn final_reply(text: impl Into<String>) -> Self {
        Effect::Reply(Reply::new(text, Keyboard::Remove))
    }

    pub fn reply_with_options(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Reply(Reply::new(text, keyboard))
    }
}
