use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};

use crate::process::AgentProcess;
use crate::{AgentError, Result};

/// Executable name the Cursor installer puts on PATH.
pub const DEFAULT_EXECUTABLE: &str = "agent";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(3);

/// Status lines shown while the agent works, one per heartbeat. The last
/// one stays up once the list runs out.
pub const PROGRESS_MESSAGES: [&str; 7] = [
    "   Understanding context...",
    "   Analyzing requirements...",
    "   Reviewing design patterns...",
    "   Checking edge cases...",
    "   Connecting the dots...",
    "   Preparing review...",
    "   Finalizing insights...",
];

/// Erase the current terminal line and return to column 0.
const CLEAR_LINE: &str = "\x1b[2K\r";

// ─── AgentRunConfig ───────────────────────────────────────────────────────

/// One headless agent run.
#[derive(Debug, Clone)]
pub struct AgentRunConfig {
    pub executable: String,
    /// Arguments placed before the prompt.
    pub args: Vec<String>,
    pub prompt: String,
    pub working_dir: PathBuf,
    pub timeout: Duration,
    pub heartbeat: Duration,
}

impl AgentRunConfig {
    /// `agent -p --force --output-format text <prompt>`: print mode, with
    /// file edits allowed and plain-text output.
    pub fn new(prompt: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            args: ["-p", "--force", "--output-format", "text"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            prompt: prompt.into(),
            working_dir: working_dir.into(),
            timeout: DEFAULT_TIMEOUT,
            heartbeat: DEFAULT_HEARTBEAT,
        }
    }

    /// Like [`new`](Self::new), with the prompt read from a file.
    pub fn from_prompt_file(prompt_path: &Path, working_dir: impl Into<PathBuf>) -> Result<Self> {
        if !prompt_path.is_file() {
            return Err(AgentError::PromptNotFound(prompt_path.to_path_buf()));
        }
        let prompt = std::fs::read_to_string(prompt_path)?;
        Ok(Self::new(prompt, working_dir))
    }

    pub fn executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = heartbeat;
        self
    }
}

// ─── Public API ───────────────────────────────────────────────────────────

/// True if `executable` resolves on PATH (or is a path to an executable).
pub fn is_available(executable: &str) -> bool {
    which::which(executable).is_ok()
}

/// Run the agent to completion, drawing progress on the terminal.
pub async fn run(config: AgentRunConfig) -> Result<()> {
    let mut stdout = std::io::stdout();
    let result = run_with_progress(config, |message| {
        let _ = write!(stdout, "{CLEAR_LINE}{message}");
        let _ = stdout.flush();
    })
    .await;
    println!();
    result
}

/// Run the agent to completion, passing each progress message to `on_progress`.
///
/// Exit code 0 is success. Exit code 1 is how the CLI reports a missing
/// login, so it maps to [`AgentError::AuthRequired`]; any other failure is
/// [`AgentError::Exited`]. At `timeout` the agent is killed and
/// [`AgentError::TimedOut`] returned.
pub async fn run_with_progress<F>(config: AgentRunConfig, mut on_progress: F) -> Result<()>
where
    F: FnMut(&'static str),
{
    let mut process = AgentProcess::spawn(
        &config.executable,
        &config.args,
        &config.prompt,
        &config.working_dir,
    )?;

    let heartbeat = config.heartbeat.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + heartbeat, heartbeat);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = sleep(config.timeout);
    tokio::pin!(deadline);
    let mut messages = PROGRESS_MESSAGES.iter().copied();

    let status = loop {
        tokio::select! {
            status = process.wait() => break status?,
            _ = &mut deadline => {
                process.kill().await;
                tracing::warn!(timeout_secs = config.timeout.as_secs(), "agent timed out");
                return Err(AgentError::TimedOut(config.timeout));
            }
            _ = ticker.tick() => {
                if let Some(message) = messages.next() {
                    on_progress(message);
                }
            }
        }
    };

    tracing::info!(code = status.code(), "agent exited");
    match status.code() {
        Some(0) => Ok(()),
        Some(1) => Err(AgentError::AuthRequired),
        code => Err(AgentError::Exited { code }),
    }
}
