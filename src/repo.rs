//! Source pull for task repositories
//!
//! Runs the configured pull command (`git pull` by default) inside a task's
//! repository directory and reports its output.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

/// Reply used when the pull command printed nothing
const EMPTY_OUTPUT: &str = "Nothing to report";

/// Longest text the Bot API accepts in one message
const MAX_OUTPUT_CHARS: usize = 4096;

/// Text reported by a pull, newlines removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullOutput(pub String);

impl PullOutput {
    /// Join raw command output into a single line, cut to one message
    pub fn from_raw(raw: &str) -> Self {
        let mut text: String = raw.chars().filter(|c| *c != '\n').collect();
        let cut = text.char_indices().nth(MAX_OUTPUT_CHARS).map(|(at, _)| at);
        if let Some(cut) = cut {
            text.truncate(cut);
        }
        if text.trim().is_empty() {
            Self(EMPTY_OUTPUT.to_string())
        } else {
            Self(text)
        }
    }
}

/// Pulls the latest source into a working directory
#[async_trait]
pub trait SourcePuller: Send + Sync {
    async fn pull(&self, dir: &Path) -> PullOutput;
}

#[async_trait]
impl<T: SourcePuller + ?Sized> SourcePuller for Arc<T> {
    async fn pull(&self, dir: &Path) -> PullOutput {
        (**self).pull(dir).await
    }
}

/// Runs an external program as the pull step
#[derive(Debug, Clone)]
pub struct CommandPuller {
    program: String,
    args: Vec<String>,
}

impl Default for CommandPuller {
    fn default() -> Self {
        Self::new("git", ["pull"])
    }
}

impl CommandPuller {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace separated command line such as `git pull --ff-only`
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }
}

#[async_trait]
impl SourcePuller for CommandPuller {
    async fn pull(&self, dir: &Path) -> PullOutput {
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(output) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::info!(
                    dir = %dir.display(),
                    exit_code = output.status.code().unwrap_or(-1),
                    "Pull finished"
                );
                PullOutput::from_raw(&format!("{stdout}{stderr}"))
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to spawn pull command");
                PullOutput(format!("Failed to run {}: {e}", self.program))
            }
        }
    }
}
