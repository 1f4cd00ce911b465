//! Wakky - Telegram remote control for always-on tasks
//!
//! Lets allowed users list the bots running as always-on tasks, then
//! restart one or pull its latest code.

mod access;
mod config;
mod repo;
mod runtime;
mod session;
mod state_machine;
mod tasks;
mod telegram;

use access::AccessGuard;
use config::Config;
use repo::CommandPuller;
use runtime::Dispatcher;
use state_machine::ConvContext;
use tasks::{HttpTaskClient, LoggingTaskClient};
use telegram::{Gateway, TelegramApi};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; variables may come from the environment
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wakky=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    // Configuration
    let config = Config::from_env()?;

    let guard = AccessGuard::new(config.allowed_user_ids.iter().copied());
    if guard.is_empty() {
        tracing::warn!("ALLOWED_USER_IDS is empty; every /bots request will be rejected");
    } else {
        tracing::info!(users = guard.len(), "Access list loaded");
    }

    let task_client = LoggingTaskClient::new(HttpTaskClient::new(&config.task_service)?);
    let puller = CommandPuller::from_command_line(&config.pull_command)
        .ok_or(config::ConfigError::EmptyPullCommand)?;

    let dispatcher = Dispatcher::new(
        ConvContext::new(config.bot_marker.clone()),
        config.server_username.clone(),
        guard,
        task_client,
        puller,
    );

    let api = TelegramApi::new(&config.telegram_api_base, &config.telegram_token)?;
    tracing::info!(
        account = %config.server_username,
        marker = %config.bot_marker,
        "Wakky started"
    );

    Gateway::new(api, dispatcher).run().await;

    Ok(())
}
