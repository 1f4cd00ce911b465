//! Runtime for handling chat messages
//!
//! Routes inbound messages through the access guard and the user's session,
//! runs the state machine, and carries out the effects it asks for.

mod executor;
pub mod traits;


pub use executor::Dispatcher;
pub use traits::{MessageId, ReplySink};

/// Inbound chat message after transport parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// `/start`
    Start,
    /// `/bots`, the conversation entry point
    Bots,
    /// Any other text, passed through untouched
    Text(String),
}

impl Incoming {
    /// Classify a message text. Commands may carry a `@botname` suffix.
    pub fn parse(text: &str) -> Self {
        let command = text
            .split_whitespace()
            .next()
            .and_then(|word| word.strip_prefix('/'))
            .map(|word| word.split('@').next().unwrap_or(word));

        match command {
            Some("start") => Incoming::Start,
            Some("bots") => Incoming::Bots,
            _ => Incoming::Text(text.to_string()),
        }
    }
}
