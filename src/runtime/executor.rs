//! Message dispatcher

use super::traits::{MessageId, ReplySink};
use super::Incoming;
use crate::access::{AccessGuard, UserId};
use crate::repo::SourcePuller;
use crate::session::{Session, SessionRegistry};
use crate::state_machine::state::TaskInventory;
use crate::state_machine::transition::NOT_ALLOWED_MESSAGE;
use crate::state_machine::{transition, ConvContext, Effect, Event, Keyboard, Reply};
use crate::tasks::TaskClient;

pub const GREETING: &str = "Bruh";

/// Handles inbound messages for every user
pub struct Dispatcher<T, P>
where
    T: TaskClient,
    P: SourcePuller,
{
    context: ConvContext,
    /// Account on the task service
    account: String,
    guard: AccessGuard,
    sessions: SessionRegistry,
    tasks: T,
    puller: P,
}

impl<T, P> Dispatcher<T, P>
where
    T: TaskClient,
    P: SourcePuller,
{
    pub fn new(
        context: ConvContext,
        account: impl Into<String>,
        guard: AccessGuard,
        tasks: T,
        puller: P,
    ) -> Self {
        Self {
            context,
            account: account.into(),
            guard,
            sessions: SessionRegistry::new(),
            tasks,
            puller,
        }
    }

    #[allow(dead_code)] // Inspected by tests
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Handle one message to completion, delivering replies as they are produced
    pub async fn handle(&self, user_id: UserId, incoming: Incoming, sink: &dyn ReplySink) {
        let event = match incoming {
            Incoming::Start => {
                sink.send(Reply::new(GREETING, Keyboard::Keep)).await;
                return;
            }
            _ if !self.guard.is_allowed(user_id) => {
                tracing::debug!(user_id, "Rejected message from user not on the allow-list");
                sink.send(Reply::new(NOT_ALLOWED_MESSAGE, Keyboard::Remove))
                    .await;
                return;
            }
            Incoming::Bots => Event::EntryCommand,
            Incoming::Text(text) => Event::UserText { text },
        };

        let session = self.sessions.get(user_id).await;
        let mut session = session.lock().await;
        self.process_event(user_id, &mut session, event, sink).await;
    }

    async fn process_event(
        &self,
        user_id: UserId,
        session: &mut Session,
        event: Event,
        sink: &dyn ReplySink,
    ) {
        // Effects that call out produce follow-up events
        let mut events_to_process = vec![event];
        // Placeholder sent for this message, if any
        let mut notice: Option<MessageId> = None;

        while let Some(current_event) = events_to_process.pop() {
            let event_name = current_event.name();
            let result = match transition(&session.state, &self.context, current_event) {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "Ignoring event");
                    continue;
                }
            };

            if result.new_state.name() != session.state.name() {
                tracing::info!(
                    user_id,
                    event = event_name,
                    from = session.state.name(),
                    to = result.new_state.name(),
                    options = ?result.new_state.inventory().map(TaskInventory::len),
                    selected = ?result.new_state.selection().map(|s| s.task_id),
                    "State changed"
                );
            }
            session.state = result.new_state;

            for effect in result.effects {
                let generated = self.execute_effect(effect, sink, &mut notice).await;
                if let Some(generated_event) = generated {
                    events_to_process.push(generated_event);
                }
            }
        }
    }

    async fn execute_effect(
        &self,
        effect: Effect,
        sink: &dyn ReplySink,
        notice: &mut Option<MessageId>,
    ) -> Option<Event> {
        match effect {
            Effect::Reply(reply) => {
                sink.send(reply).await;
                None
            }
            Effect::Notice(reply) => {
                *notice = sink.send(reply).await;
                None
            }
            Effect::DismissNotice => {
                if let Some(message_id) = notice.take() {
                    sink.delete(message_id).await;
                }
                None
            }
            Effect::ListTasks => {
                let tasks = self.tasks.list_tasks(&self.account).await;
                Some(Event::TasksListed { tasks })
            }
            Effect::RestartTask { task_id } => {
                let outcome = self.tasks.restart_task(&self.account, task_id).await;
                Some(Event::RestartCompleted { outcome })
            }
            Effect::PullRepository { dir } => {
                let output = self.puller.pull(&dir).await;
                Some(Event::PullCompleted { output })
            }
        }
    }
}
