//! claude-hooks CLI - send webhook notifications for agent lifecycle hooks.
//!
//! Commands:
//! - `claude-hooks notification`: the host is waiting for input or permission
//! - `claude-hooks stop` / `claude-hooks subagent-stop`: a run finished
//! - `claude-hooks long-operation`: an operation ran longer than expected
//! - `claude-hooks create-start-file`: record a start time for `long-operation`
//!
//! Exit codes:
//! - 0: Success (including a long operation that stayed under its threshold)
//! - 1: Error (unrecognized event, missing configuration, delivery failure)
//! - 2: Usage error

use std::io::{self, IsTerminal, Read};

use clap::Parser;

use claude_hooks::commands::{self, Invocation, Outcome};
use claude_hooks::{logging, Cli, Commands, ConfigLoader, HookInput, HooksResult};

/// Exit code returned for any pipeline failure.
const ERROR_EXIT_CODE: i32 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.debug, cli.log_file.as_deref());

    let exit_code = dispatch_command(cli).await;
    std::process::exit(exit_code);
}

/// Run the parsed command and map the result to an exit code.
async fn dispatch_command(cli: Cli) -> i32 {
    let invocation = match build_invocation(&cli) {
        Ok(invocation) => invocation,
        Err(e) => return report_error(e),
    };

    match commands::run(cli, &invocation).await {
        Ok(outcome) => {
            report_outcome(&outcome);
            0
        }
        Err(e) => report_error(e),
    }
}

fn build_invocation(cli: &Cli) -> HooksResult<Invocation> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::new().with_file(path),
        None => ConfigLoader::new(),
    };
    let input = if reads_hook_input(&cli.command) {
        read_hook_input()
    } else {
        None
    };
    Ok(Invocation::new(loader, input, std::env::current_dir()?))
}

/// Only commands that send a notification look at the host payload.
fn reads_hook_input(command: &Commands) -> bool {
    !matches!(command, Commands::CreateStartFile { .. } | Commands::Other(_))
}

/// Read the hook JSON the host pipes on stdin, if any.
fn read_hook_input() -> Option<HookInput> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return None;
    }

    let mut raw = String::new();
    if let Err(e) = stdin.lock().read_to_string(&mut raw) {
        tracing::warn!("Could not read hook input from stdin: {}", e);
        return None;
    }
    tracing::debug!("Input: {}", raw.trim());
    HookInput::parse(&raw)
}

fn report_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Sent(message) => tracing::debug!(text = %message.text, "Delivered"),
        Outcome::Skipped(reason) => tracing::info!("Nothing sent: {}", reason),
        Outcome::StartFileCreated(path) => {
            tracing::debug!(path = %path.display(), "Start file created")
        }
    }
}

fn report_error<E: std::fmt::Display>(error: E) -> i32 {
    tracing::debug!("{}", error);
    eprintln!("Error: {}", error);
    ERROR_EXIT_CODE
}
