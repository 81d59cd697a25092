//! Classify, render and deliver in one place.

use tracing::debug;

use crate::config::HooksConfig;
use crate::context::HookContext;
use crate::dispatcher::NotificationDispatcher;
use crate::error::HooksResult;
use crate::event::MessageTemplate;
use crate::message::NotificationMessage;

/// A configured dispatcher plus the rendering options that go with it.
#[derive(Debug, Clone)]
pub struct HookPipeline {
    dispatcher: NotificationDispatcher,
    text_template: Option<String>,
}

impl HookPipeline {
    /// Resolve the webhook target from `config`.
    ///
    /// Fails with `MissingConfiguration` before any network activity when no
    /// webhook is configured.
    pub fn from_config(config: &HooksConfig) -> HooksResult<Self> {
        let target = config.target()?;
        Ok(Self {
            dispatcher: NotificationDispatcher::new(target)?,
            text_template: config.text_template.clone(),
        })
    }

    /// Render `template` for `context` without sending it.
    pub fn render(&self, template: &MessageTemplate, context: &HookContext) -> NotificationMessage {
        NotificationMessage::render(
            template,
            context,
            self.dispatcher.target(),
            self.text_template.as_deref(),
        )
    }

    /// Render and deliver; returns the message that was sent.
    pub async fn send(
        &self,
        template: &MessageTemplate,
        context: &HookContext,
    ) -> HooksResult<NotificationMessage> {
        let message = self.render(template, context);
        debug!(text = %message.text, "Rendered notification");
        self.dispatcher.deliver(&message).await?;
        Ok(message)
    }
}
