use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent CLI '{0}' not found on PATH")]
    NotInstalled(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt file not found: {}", .0.display())]
    PromptNotFound(PathBuf),

    #[error("agent timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("agent exited with {}", exit_label(.code))]
    Exited { code: Option<i32> },

    #[error("agent requires authentication: run 'agent login' or set CURSOR_API_KEY")]
    AuthRequired,
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "a signal".to_string(),
    }
}
