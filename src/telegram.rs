//! Telegram transport
//!
//! Long-polls the Bot API for updates, hands each text message to the
//! dispatcher and sends the replies back with reply keyboards.

mod types;

use crate::repo::SourcePuller;
use crate::runtime::{Dispatcher, Incoming, MessageId, ReplySink};
use crate::state_machine::Reply;
use crate::tasks::TaskClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use types::{
    ApiResponse, DeleteMessage, GetUpdates, ReplyMarkup, SendMessage, SentMessage, Update,
};

const LONG_POLL_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = LONG_POLL_TIMEOUT_SECS + 10;
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("telegram request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("telegram {method} failed: {description}")]
    Api {
        method: &'static str,
        description: String,
    },
}

/// Minimal Bot API client
pub struct TelegramApi {
    http: Client,
    /// `<api base>/bot<token>`
    bot_url: String,
}

impl TelegramApi {
    pub fn new(api_base: &str, token: &str) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            bot_url: format!("{}/bot{token}", api_base.trim_end_matches('/')),
        })
    }

    async fn call<B, T>(&self, method: &'static str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let parsed = self
            .http
            .post(format!("{}/{method}", self.bot_url))
            .json(body)
            .send()
            .await?
            .json::<ApiResponse<T>>()
            .await?;

        match parsed {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(TelegramError::Api {
                method,
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }

    /// Fetch updates after `offset`, waiting up to the long-poll timeout
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: LONG_POLL_TIMEOUT_SECS,
                allowed_updates: vec!["message"],
            },
        )
        .await
    }

    /// Send a message, returning its id
    pub async fn send_message(
        &self,
        chat_id: i64,
        reply: &Reply,
    ) -> Result<MessageId, TelegramError> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id,
                    text: &reply.text,
                    reply_markup: ReplyMarkup::from_keyboard(&reply.keyboard),
                },
            )
            .await?;
        Ok(sent.message_id)
    }

    pub async fn delete_message(
        &self,
        chat_id: i64,
        message_id: MessageId,
    ) -> Result<(), TelegramError> {
        let _: bool = self
            .call("deleteMessage", &DeleteMessage { chat_id, message_id })
            .await?;
        Ok(())
    }
}

/// Sends replies to one chat
struct ChatSink<'a> {
    api: &'a TelegramApi,
    chat_id: i64,
}

#[async_trait]
impl<'a> ReplySink for ChatSink<'a> {
    async fn send(&self, reply: Reply) -> Option<MessageId> {
        match self.api.send_message(self.chat_id, &reply).await {
            Ok(message_id) => Some(message_id),
            Err(e) => {
                tracing::warn!(chat_id = self.chat_id, error = %e, "Failed to send reply");
                None
            }
        }
    }

    async fn delete(&self, message_id: MessageId) {
        if let Err(e) = self.api.delete_message(self.chat_id, message_id).await {
            tracing::warn!(
                chat_id = self.chat_id,
                message_id,
                error = %e,
                "Failed to delete message"
            );
        }
    }
}

/// Polling loop feeding the dispatcher
pub struct Gateway<T, P>
where
    T: TaskClient,
    P: SourcePuller,
{
    api: TelegramApi,
    dispatcher: Dispatcher<T, P>,
}

impl<T, P> Gateway<T, P>
where
    T: TaskClient,
    P: SourcePuller,
{
    pub fn new(api: TelegramApi, dispatcher: Dispatcher<T, P>) -> Self {
        Self { api, dispatcher }
    }

    /// Poll until the process receives Ctrl-C
    pub async fn run(&self) {
        self.run_until(tokio::signal::ctrl_c()).await;
    }

    /// Poll until `shutdown` resolves. A shutdown that fires while an update
    /// is being handled stops the loop before the next poll.
    pub async fn run_until<F: Future>(&self, shutdown: F) {
        let mut offset = 0i64;
        tokio::pin!(shutdown);
        tracing::info!("Polling for updates");

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutting down");
                    break;
                }
                polled = self.api.get_updates(offset) => {
                    match polled {
                        Ok(updates) => {
                            offset = next_offset(offset, &updates);
                            for update in updates {
                                self.handle_update(update).await;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Polling failed");
                            tokio::time::sleep(RETRY_DELAY).await;
                        }
                    }
                }
            }
        }
    }

    async fn handle_update(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let (Some(user), Some(text)) = (message.from, message.text) else {
            tracing::debug!(update_id = update.update_id, "Skipping update without text");
            return;
        };

        let sink = ChatSink {
            api: &self.api,
            chat_id: message.chat.id,
        };
        self.dispatcher
            .handle(user.id, Incoming::parse(&text), &sink)
            .await;
    }
}

fn next_offset(offset: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id.saturating_add(1))
        .fold(offset, i64::max)
}
