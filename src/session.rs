//! Per-user session registry

use crate::access::UserId;
use crate::state_machine::ConvState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// One user's conversation
#[derive(Debug, Default)]
pub struct Session {
    pub state: ConvState,
}

/// Shared handle to a session; the lock serializes that user's messages
pub type SessionHandle = Arc<Mutex<Session>>;

/// Maps user identities to their sessions, created on first access
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<UserId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `user_id`, creating an idle one if needed
    pub async fn get(&self, user_id: UserId) -> SessionHandle {
        if let Some(session) = self.sessions.read().await.get(&user_id) {
            return Arc::clone(session);
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user_id).or_insert_with(|| {
            tracing::debug!(user_id, "Creating session");
            Arc::new(Mutex::new(Session::default()))
        });
        Arc::clone(session)
    }

    /// Look up a session without creating it
    #[allow(dead_code)] // API completeness
    pub async fn find(&self, user_id: UserId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    #[allow(dead_code)] // API completeness
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
