//! Anonymous usage counts.
//!
//! Only the command name, CLI version and OS family are sent, keyed by a
//! random id kept in the user's config directory. Every failure is
//! swallowed: telemetry must never change a command's outcome.

use crate::config::TelemetryConfig;
use crate::error::{DesignError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const TELEMETRY_ENV: &str = "SUPERDESIGNER_TELEMETRY";
pub const TELEMETRY_URL_ENV: &str = "SUPERDESIGNER_TELEMETRY_URL";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const STATE_FILE: &str = "telemetry.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Init,
    Review,
    ReviewAgent,
}

impl Event {
    pub fn as_str(self) -> &'static str {
        match self {
            Event::Init => "cmd_init",
            Event::Review => "cmd_review",
            Event::ReviewAgent => "cmd_review_agent",
        }
    }
}

/// `0` and `false` opt out; anything else, or unset, leaves telemetry on.
pub fn env_opt_out(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("0") | Some("false"))
}

/// Per-user config directory: `%APPDATA%\superdesigner` on Windows,
/// `~/.config/superdesigner` elsewhere.
pub fn user_config_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Ok(PathBuf::from(appdata).join("superdesigner"));
        }
    }
    let home = home::home_dir().ok_or(DesignError::HomeNotFound)?;
    Ok(home.join(".config").join("superdesigner"))
}

// ---------------------------------------------------------------------------
// Persisted state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryState {
    #[serde(default)]
    pub anon_id: String,
    #[serde(default)]
    pub nudges: serde_json::Map<String, serde_json::Value>,
}

impl TelemetryState {
    /// Read the state file, or an empty state when it is absent or corrupt.
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }
}

/// The stored anonymous id, minting and persisting one on first use.
pub fn anon_id(path: &Path) -> Result<String> {
    let mut state = TelemetryState::load(path);
    if !state.anon_id.is_empty() {
        return Ok(state.anon_id);
    }
    state.anon_id = uuid::Uuid::new_v4().to_string();
    state.save(path)?;
    Ok(state.anon_id)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct Props<'a> {
    version: &'a str,
    platform: &'static str,
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    anon_id: &'a str,
    event: &'static str,
    props: Props<'a>,
}

#[derive(Debug, Clone)]
pub struct Telemetry {
    url: Option<String>,
    state_path: Option<PathBuf>,
}

impl Telemetry {
    pub fn disabled() -> Self {
        Self {
            url: None,
            state_path: None,
        }
    }

    /// Resolve the effective settings. The environment URL overrides the
    /// config one; any opt-out wins.
    pub fn new(config: &TelemetryConfig, cli_opt_out: bool) -> Self {
        let env_value = std::env::var(TELEMETRY_ENV).ok();
        if cli_opt_out || !config.enabled || env_opt_out(env_value.as_deref()) {
            return Self::disabled();
        }
        let url = std::env::var(TELEMETRY_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| Some(config.url.clone()).filter(|u| !u.trim().is_empty()));
        Self {
            url,
            state_path: user_config_dir().ok().map(|d| d.join(STATE_FILE)),
        }
    }

    pub fn with_state_path(mut self, path: PathBuf) -> Self {
        self.state_path = Some(path);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some() && self.state_path.is_some()
    }

    /// Send one event. Never fails.
    pub fn track(&self, event: Event, version: &str) {
        if let Err(e) = self.try_track(event, version) {
            tracing::debug!(event = event.as_str(), error = %e, "telemetry not sent");
        }
    }

    fn try_track(&self, event: Event, version: &str) -> Result<()> {
        let (Some(url), Some(state_path)) = (&self.url, &self.state_path) else {
            return Ok(());
        };
        let id = anon_id(state_path)?;
        let payload = Payload {
            anon_id: &id,
            event: event.as_str(),
            props: Props {
                version,
                platform: std::env::consts::OS,
            },
        };
        reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?
            .post(url)
            .json(&payload)
            .send()?;
        Ok(())
    }
}
