//! Command handlers.
//!
//! Each handler returns an [`Outcome`] on success; every failure is a
//! [`HooksError`] that `main` turns into a diagnostic and a non-zero exit.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use claude_hooks_common::timing::{self, format_duration};
use claude_hooks_common::{
    ConfigLoader, HookContext, HookEvent, HookInput, HookPipeline, HooksError, HooksResult,
    LongOperation, MessageTemplate, NotificationMessage,
};
use tracing::{debug, info};

use crate::cli::{Cli, Commands};

/// What a successful invocation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A notification was delivered.
    Sent(NotificationMessage),
    /// Nothing needed sending.
    Skipped(String),
    /// A start file was written.
    StartFileCreated(PathBuf),
}

/// Inputs shared by every command.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Where configuration is read from.
    pub loader: ConfigLoader,
    /// Hook payload read from stdin.
    pub input: Option<HookInput>,
    /// Working directory to report when the payload has none.
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(loader: ConfigLoader, input: Option<HookInput>, cwd: PathBuf) -> Self {
        Self { loader, input, cwd }
    }

    /// Load configuration and resolve the webhook; fails before any network use.
    fn pipeline(&self) -> HooksResult<HookPipeline> {
        let config = self.loader.load()?;
        HookPipeline::from_config(&config)
    }

    fn context(&self) -> HookContext {
        let context = HookContext::new(self.cwd.clone(), Utc::now());
        match &self.input {
            Some(input) => context.with_input(input.clone()),
            None => context,
        }
    }
}

/// Run the parsed command.
pub async fn run(cli: Cli, invocation: &Invocation) -> HooksResult<Outcome> {
    match cli.command {
        Commands::Notification => send_event(HookEvent::Notification, invocation).await,
        Commands::Stop => send_event(HookEvent::Stop, invocation).await,
        Commands::SubagentStop => send_event(HookEvent::SubagentStop, invocation).await,
        Commands::Other(args) => {
            let keyword = args.first().map(String::as_str).unwrap_or_default();
            let event: HookEvent = keyword.parse()?;
            send_event(event, invocation).await
        }
        Commands::LongOperation {
            duration,
            start_file,
            threshold,
            operation_type,
        } => {
            long_operation(
                duration,
                start_file.as_deref(),
                threshold,
                operation_type,
                invocation,
            )
            .await
        }
        Commands::CreateStartFile { file } => create_start_file(&file),
    }
}

/// Send the notification for a classified hook event.
pub async fn send_event(event: HookEvent, invocation: &Invocation) -> HooksResult<Outcome> {
    debug!(event = %event, "Classified hook event");
    let pipeline = invocation.pipeline()?;
    deliver(&pipeline, &event.template(), invocation).await
}

/// Report a long-running operation.
///
/// With a start file, the notification is sent only when the measured
/// duration exceeds `threshold` seconds. A direct non-zero `duration` always
/// notifies; zero counts as no duration at all.
pub async fn long_operation(
    duration: Option<u64>,
    start_file: Option<&Path>,
    threshold: u64,
    operation_type: String,
    invocation: &Invocation,
) -> HooksResult<Outcome> {
    let pipeline = invocation.pipeline()?;

    let elapsed = match (start_file, duration) {
        (Some(path), _) => match timing::take_elapsed(path, Utc::now()) {
            Some(elapsed) if elapsed.as_secs() > threshold => elapsed,
            Some(elapsed) => {
                return Ok(Outcome::Skipped(format!(
                    "operation took {}, not over the {}s threshold",
                    format_duration(elapsed.as_secs()),
                    threshold
                )));
            }
            None => {
                return Ok(Outcome::Skipped(format!(
                    "no usable start file at {}",
                    path.display()
                )));
            }
        },
        (None, Some(secs)) if secs > 0 => Duration::from_secs(secs),
        (None, _) => {
            return Err(HooksError::invalid(
                "long-operation",
                "either --duration or --start-file must be specified",
            ));
        }
    };

    let operation = LongOperation::new(elapsed, operation_type);
    deliver(&pipeline, &operation.template(), invocation).await
}

/// Write the current time to `path` for a later `long-operation --start-file`.
pub fn create_start_file(path: &Path) -> HooksResult<Outcome> {
    timing::create_start_file(path, Utc::now())?;
    Ok(Outcome::StartFileCreated(path.to_path_buf()))
}

async fn deliver(
    pipeline: &HookPipeline,
    template: &MessageTemplate,
    invocation: &Invocation,
) -> HooksResult<Outcome> {
    let context = invocation.context();
    let message = pipeline.send(template, &context).await?;
    info!(event = %message.event, project = %context.project(), "Sent hook notification");
    Ok(Outcome::Sent(message))
}
