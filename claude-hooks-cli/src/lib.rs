//! claude-hooks - forward agent lifecycle hooks to a messaging webhook.
//!
//! The binary is a thin shell around [`commands::run`]; the pipeline itself
//! lives in `claude-hooks-common`, re-exported here.

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Commands};
pub use claude_hooks_common::*;
