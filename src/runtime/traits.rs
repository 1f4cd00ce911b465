//! Trait abstractions for runtime I/O
//!
//! The task service and source pull traits live next to their
//! implementations; this module holds the outbound side.

use crate::state_machine::Reply;
use async_trait::async_trait;
use std::sync::Arc;

/// Chat-scoped id of a delivered message
pub type MessageId = i64;

/// Destination for replies produced while handling one message
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Deliver a reply, returning its id when the transport reports one.
    /// Delivery failures are the sink's to log.
    async fn send(&self, reply: Reply) -> Option<MessageId>;

    /// Remove a message delivered earlier by this sink
    async fn delete(&self, message_id: MessageId);
}

#[async_trait]
impl<T: ReplySink + ?Sized> ReplySink for Arc<T> {
    async fn send(&self, reply: Reply) -> Option<MessageId> {
        (**self).send(reply).await
    }

    async fn delete(&self, message_id: MessageId) {
        (**self).delete(message_id).await;
    }
}
