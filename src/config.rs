//! Process configuration read from the environment

use crate::access::UserId;
use crate::tasks::TaskServiceConfig;
use std::collections::HashMap;
use thiserror::Error;

const DEFAULT_BOT_MARKER: &str = "Bot";
const DEFAULT_PULL_COMMAND: &str = "git pull";
const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required variable {0}")]
    Missing(&'static str),
    #[error("invalid user id {value:?} in ALLOWED_USER_IDS")]
    InvalidUserId { value: String },
    #[error("PULL_COMMAND is empty")]
    EmptyPullCommand,
}

/// Everything the bot needs at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub telegram_api_base: String,
    pub allowed_user_ids: Vec<UserId>,
    /// Account whose always-on tasks are managed
    pub server_username: String,
    pub task_service: TaskServiceConfig,
    pub bot_marker: String,
    pub pull_command: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str, default: &str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        // Present but empty is allowed: nobody passes the guard
        let Some(raw_user_ids) = vars.get("ALLOWED_USER_IDS") else {
            return Err(ConfigError::Missing("ALLOWED_USER_IDS"));
        };
        let allowed_user_ids = parse_user_ids(raw_user_ids)?;

        let pull_command = optional("PULL_COMMAND", DEFAULT_PULL_COMMAND);
        if pull_command.split_whitespace().next().is_none() {
            return Err(ConfigError::EmptyPullCommand);
        }

        Ok(Self {
            telegram_token: required("WAKKY_TELEGRAM_API_KEY")?,
            telegram_api_base: optional("TELEGRAM_API_BASE", DEFAULT_TELEGRAM_API_BASE),
            allowed_user_ids,
            server_username: required("SERVER_USERNAME")?,
            task_service: TaskServiceConfig {
                base_url: optional("SERVER_API_BASE", crate::tasks::DEFAULT_API_BASE),
                token: required("SERVER_TOKEN")?,
            },
            bot_marker: optional("BOT_MARKER", DEFAULT_BOT_MARKER),
            pull_command,
        })
    }
}

/// Parse a comma separated id list, skipping empty items
fn parse_user_ids(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse().map_err(|_| ConfigError::InvalidUserId {
                value: item.to_string(),
            })
        })
        .collect()
}
