//! Ambient context for a single hook invocation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

/// Hook payload the host pipes on stdin.
///
/// Every field is optional; hosts differ in what they send and the
/// notification is still useful without any of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HookInput {
    /// Unique session identifier.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Path to the transcript file.
    #[serde(default)]
    pub transcript_path: Option<String>,

    /// Working directory of the session.
    #[serde(default)]
    pub cwd: Option<String>,

    /// Host-side event name, e.g. "Stop" or "Notification".
    #[serde(default)]
    pub hook_event_name: Option<String>,

    /// Human-readable message attached to notification events.
    #[serde(default)]
    pub message: Option<String>,
}

impl HookInput {
    /// Parse the raw stdin payload.
    ///
    /// Empty input and malformed JSON both yield `None`; the latter is logged.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match serde_json::from_str(raw) {
            Ok(input) => Some(input),
            Err(e) => {
                warn!("Ignoring malformed hook input: {}", e);
                None
            }
        }
    }
}

/// Everything known about the invocation besides the event itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookContext {
    pub cwd: PathBuf,
    pub session_id: Option<String>,
    /// Message supplied by the host, used as the notification status.
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl HookContext {
    pub fn new(cwd: impl Into<PathBuf>, timestamp: DateTime<Utc>) -> Self {
        Self {
            cwd: cwd.into(),
            session_id: None,
            message: None,
            timestamp,
        }
    }

    /// Overlay fields from the host payload.
    pub fn with_input(mut self, input: HookInput) -> Self {
        if let Some(cwd) = input.cwd.filter(|c| !c.trim().is_empty()) {
            self.cwd = PathBuf::from(cwd);
        }
        self.session_id = input.session_id.filter(|s| !s.trim().is_empty());
        self.message = input.message.filter(|m| !m.trim().is_empty());
        if let Some(name) = input.hook_event_name {
            debug!(hook = %name, "Host reported hook event");
        }
        self
    }

    /// Name of the project directory.
    pub fn project(&self) -> String {
        project_name(&self.cwd)
    }
}

fn project_name(cwd: &Path) -> String {
    cwd.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cwd.display().to_string())
}
