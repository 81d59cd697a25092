//! CLI definition for the claude-hooks command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// claude-hooks - forward agent lifecycle hooks to a messaging webhook.
#[derive(Parser, Debug)]
#[command(name = "claude-hooks")]
#[command(version)]
#[command(about = "Send Slack notifications for Claude Code hook events")]
#[command(arg_required_else_help = true)]
#[command(after_help = "\
Examples:
  # Send notification hook
  claude-hooks notification

  # Send stop hook
  claude-hooks stop

  # Send long operation notification (30 second duration)
  claude-hooks long-operation --duration 30

  # Create start file for timing operations
  claude-hooks create-start-file --file ~/.claude/bash_start.tmp

  # Check operation duration using start file
  claude-hooks long-operation --start-file ~/.claude/bash_start.tmp --threshold 30")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "CLAUDE_HOOKS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Also append logs to this file
    #[arg(long, global = true, env = "CLAUDE_HOOKS_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Send the notification hook (waiting for input or permission)
    Notification,
    /// Send the stop hook
    Stop,
    /// Send the subagent stop hook
    SubagentStop,
    /// Send a long operation notification
    LongOperation {
        /// Duration in seconds
        #[arg(long, required_unless_present = "start_file")]
        duration: Option<u64>,
        /// File containing the start timestamp to calculate the duration from
        #[arg(long, value_name = "PATH")]
        start_file: Option<PathBuf>,
        /// Minimum duration in seconds before a start-file measurement notifies
        #[arg(long, default_value_t = claude_hooks_common::timing::DEFAULT_THRESHOLD_SECS)]
        threshold: u64,
        /// Type of operation, e.g. Bash or Task
        #[arg(long, default_value = claude_hooks_common::LongOperation::DEFAULT_OPERATION_TYPE)]
        operation_type: String,
    },
    /// Create a start timestamp file for operation timing
    CreateStartFile {
        /// Path to create the start timestamp file
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },
    /// Any other event keyword; rejected as unrecognized.
    #[command(external_subcommand)]
    Other(Vec<String>),
}
