//! Allow-list of chat users permitted to drive the bot

use std::collections::HashSet;

/// Telegram user identity
pub type UserId = i64;

/// Fixed set of allowed user ids, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct AccessGuard {
    allowed: HashSet<UserId>,
}

impl AccessGuard {
    pub fn new(allowed: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    pub fn is_allowed(&self, user_id: UserId) -> bool {
        self.allowed.contains(&user_id)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
