//! Event classification.
//!
//! Maps a hook keyword supplied by the host tool to the message template
//! that describes it. The set of events is closed: adding one means adding
//! a variant and a match arm in [`HookEvent::template`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HooksError;
use crate::timing::format_duration;

/// Lifecycle events that can be forwarded to the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    /// The agent finished responding.
    Stop,
    /// A subagent finished.
    SubagentStop,
    /// The host needs attention (permission prompt, idle input).
    Notification,
}

impl HookEvent {
    /// Every known event, in the order they are listed in help output.
    pub const ALL: [HookEvent; 3] = [
        HookEvent::Notification,
        HookEvent::Stop,
        HookEvent::SubagentStop,
    ];

    /// The command-line keyword for this event.
    pub fn keyword(&self) -> &'static str {
        match self {
            HookEvent::Stop => "stop",
            HookEvent::SubagentStop => "subagent-stop",
            HookEvent::Notification => "notification",
        }
    }

    /// Message template describing this event.
    pub fn template(&self) -> MessageTemplate {
        let (title, status) = match self {
            HookEvent::Notification => (
                "🔔 Claude Code Notification",
                "Waiting for user input or permission",
            ),
            HookEvent::Stop => ("⏹️ Claude Code Stopped", "Operation stopped"),
            HookEvent::SubagentStop => ("⏹️ Claude Code Subagent Stopped", "Subagent stopped"),
        };

        MessageTemplate {
            event: self.keyword().to_string(),
            title: title.to_string(),
            detail: Detail::Status(status.to_string()),
            severity: Severity::Info,
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for HookEvent {
    type Err = HooksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookEvent::ALL
            .into_iter()
            .find(|event| event.keyword() == s)
            .ok_or_else(|| HooksError::UnrecognizedEvent(s.to_string()))
    }
}

/// How urgent a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The event-specific line shown under the project field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail {
    /// A status sentence.
    Status(String),
    /// How long an operation ran.
    Duration(Duration),
}

impl Detail {
    /// Field label and rendered value.
    pub fn field(&self) -> (&'static str, String) {
        match self {
            Detail::Status(status) => ("💬 Status", status.clone()),
            Detail::Duration(duration) => ("⏱️ Duration", format_duration(duration.as_secs())),
        }
    }

    /// Plain-text form used in the fallback message text.
    pub fn summary(&self) -> String {
        match self {
            Detail::Status(status) => status.clone(),
            Detail::Duration(duration) => format!("ran for {}", format_duration(duration.as_secs())),
        }
    }
}

/// The unrendered shape of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    /// Keyword of the event that produced this template.
    pub event: String,
    pub title: String,
    pub detail: Detail,
    pub severity: Severity,
}

impl MessageTemplate {
    /// Replace the status line with a host-supplied message, if any.
    ///
    /// Duration details are left untouched.
    pub fn with_status_override(mut self, status: Option<&str>) -> Self {
        if let (Detail::Status(_), Some(status)) = (&self.detail, status) {
            let status = status.trim();
            if !status.is_empty() {
                self.detail = Detail::Status(status.to_string());
            }
        }
        self
    }
}

/// A command or tool call that ran longer than expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongOperation {
    pub duration: Duration,
    /// Label such as "Bash" or "Task".
    pub operation_type: String,
}

impl LongOperation {
    pub const DEFAULT_OPERATION_TYPE: &'static str = "Operation";

    pub fn new(duration: Duration, operation_type: impl Into<String>) -> Self {
        Self {
            duration,
            operation_type: operation_type.into(),
        }
    }

    pub fn template(&self) -> MessageTemplate {
        MessageTemplate {
            event: "long-operation".to_string(),
            title: format!("⚠️ Long {} Operation", self.operation_type),
            detail: Detail::Duration(self.duration),
            severity: Severity::Warning,
        }
    }
}
