//! Headless driver for the Cursor `agent` CLI.
//!
//! The agent is handed a prompt that tells it which files to read and
//! write. This crate starts it in the project directory and turns its exit
//! into a typed result, showing rotating status lines while it runs.
//!
//! ```text
//! AgentRunConfig
//!     │
//!     ▼
//! AgentProcess   ← spawns `agent -p --force --output-format text <prompt>`
//!     │             stdout/stderr drained and discarded
//!     ▼
//! run()          ← select! over exit, timeout and heartbeat ticks
//! ```
//!
//! ```rust,ignore
//! use cursor_agent::{run, AgentRunConfig};
//!
//! let cfg = AgentRunConfig::from_prompt_file(&prompt_path, &project_dir)?;
//! run(cfg).await?;
//! ```

pub mod error;
pub mod runner;

pub(crate) mod process;


pub use error::AgentError;
pub use runner::{
    is_available, run, run_with_progress, AgentRunConfig, DEFAULT_EXECUTABLE, PROGRESS_MESSAGES,
};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, AgentError>;
