//! Rendered notifications and their Slack Block Kit payload.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::config::WebhookTarget;
use crate::context::HookContext;
use crate::event::{MessageTemplate, Severity};

/// Fallback text template used when none is configured.
pub const DEFAULT_TEXT_TEMPLATE: &str = "{title}: {status} ({project})";

/// A notification ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    /// Plain-text fallback shown in push notifications and by clients
    /// that do not render blocks.
    pub text: String,
    pub title: String,
    /// Ordered `(label, value)` pairs rendered as section fields.
    pub fields: Vec<(String, String)>,
    pub channel: Option<String>,
    pub severity: Severity,
    pub event: String,
    pub timestamp: DateTime<Utc>,
}

impl NotificationMessage {
    /// Render a template against the invocation context.
    pub fn render(
        template: &MessageTemplate,
        context: &HookContext,
        target: &WebhookTarget,
        text_template: Option<&str>,
    ) -> Self {
        let template = template.clone().with_status_override(context.message.as_deref());
        let project = context.project();

        let mut fields = vec![("📁 Project".to_string(), project.clone())];
        let (label, value) = template.detail.field();
        fields.push((label.to_string(), value));
        if let Some(session_id) = &context.session_id {
            fields.push(("🧵 Session".to_string(), session_id.clone()));
        }
        if let Some(member_id) = &target.member_id {
            fields.push(("👤 Dev".to_string(), format!("<@{}>", member_id)));
        }

        let timestamp = context.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        let text = fill(
            text_template.unwrap_or(DEFAULT_TEXT_TEMPLATE),
            &[
                ("title", template.title.as_str()),
                ("status", template.detail.summary().as_str()),
                ("event", template.event.as_str()),
                ("project", project.as_str()),
                ("cwd", context.cwd.display().to_string().as_str()),
                ("session_id", context.session_id.as_deref().unwrap_or("")),
                ("timestamp", timestamp.as_str()),
            ],
        );

        Self {
            text,
            title: template.title,
            fields,
            channel: target.channel.clone(),
            severity: template.severity,
            event: template.event,
            timestamp: context.timestamp,
        }
    }

    /// JSON body posted to the webhook.
    pub fn to_payload(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|(name, value)| {
                json!({
                    "type": "mrkdwn",
                    "text": format!("*{}:*\n{}", name, value)
                })
            })
            .collect();

        let mut payload = json!({
            "text": self.text,
            "blocks": [
                {
                    "type": "header",
                    "text": {
                        "type": "plain_text",
                        "text": self.title
                    }
                },
                {
                    "type": "section",
                    "fields": fields
                },
                {
                    "type": "context",
                    "elements": [
                        {
                            "type": "mrkdwn",
                            "text": format!(
                                "Event: `{}` · Severity: {} · {}",
                                self.event,
                                self.severity,
                                self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
                            )
                        }
                    ]
                }
            ]
        });

        if let (Some(channel), Some(obj)) = (&self.channel, payload.as_object_mut()) {
            obj.insert("channel".to_string(), Value::String(channel.clone()));
        }

        payload
    }
}

/// Replace `{name}` placeholders with their values; unknown ones stay as-is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}
