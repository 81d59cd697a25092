//! claude-hooks common - core library for forwarding agent lifecycle hooks
//! to a messaging webhook.
//!
//! The pipeline is linear:
//!
//! 1. [`HookEvent`] classifies the keyword the host passed on the command
//!    line into a [`MessageTemplate`].
//! 2. [`HookContext`] gathers the working directory, session id and any
//!    message the host piped on stdin.
//! 3. [`NotificationMessage::render`] fills the template in.
//! 4. [`NotificationDispatcher::deliver`] makes exactly one POST.
//!
//! ```rust,no_run
//! use claude_hooks_common::{ConfigLoader, HookContext, HookEvent, HookPipeline};
//!
//! # async fn run() -> claude_hooks_common::HooksResult<()> {
//! let event: HookEvent = "stop".parse()?;
//! let config = ConfigLoader::new().load()?;
//! let pipeline = HookPipeline::from_config(&config)?;
//! let context = HookContext::new(std::env::current_dir()?, chrono::Utc::now());
//! pipeline.send(&event.template(), &context).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod message;
pub mod pipeline;
pub mod timing;

pub use config::{ConfigLoader, HooksConfig, WebhookTarget};
pub use context::{HookContext, HookInput};
pub use dispatcher::NotificationDispatcher;
pub use error::{DeliveryError, HooksError, HooksResult};
pub use event::{HookEvent, LongOperation, MessageTemplate, Severity};
pub use message::NotificationMessage;
pub use pipeline::HookPipeline;
