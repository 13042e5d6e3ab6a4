use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};

use crate::{AgentError, Result};

// ─── AgentProcess ─────────────────────────────────────────────────────────

/// A running headless agent.
///
/// The agent writes its own files; its stdout and stderr are drained in
/// background tasks and discarded so a chatty agent never blocks on a full
/// pipe.
pub(crate) struct AgentProcess {
    child: Child,
}

impl AgentProcess {
    /// Spawn `executable args… prompt` in `working_dir`.
    pub(crate) fn spawn(
        executable: &str,
        args: &[String],
        prompt: &str,
        working_dir: &Path,
    ) -> Result<Self> {
        let mut cmd = Command::new(executable);
        cmd.args(args)
            .arg(prompt)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AgentError::NotInstalled(executable.to_string()),
            _ => AgentError::Io(e),
        })?;
        tracing::info!(
            executable,
            pid = child.id(),
            cwd = %working_dir.display(),
            "spawned agent"
        );

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(drain(stdout, "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain(stderr, "stderr"));
        }

        Ok(Self { child })
    }

    /// Wait for exit. Cancel safe, so it can sit in a `select!` loop.
    pub(crate) async fn wait(&mut self) -> Result<ExitStatus> {
        Ok(self.child.wait().await?)
    }

    /// Kill the agent and reap it.
    pub(crate) async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::warn!(error = %e, "failed to kill agent");
        }
    }
}

async fn drain<R: AsyncRead + Unpin>(mut reader: R, stream: &'static str) {
    let mut buf = [0u8; 8192];
    let mut total = 0usize;
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) => {
                tracing::debug!(stream, error = %e, "agent output read failed");
                break;
            }
        }
    }
    tracing::debug!(stream, bytes = total, "agent output discarded");
}
