//! Command implementations for sweep.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod inspect;
mod rollback;
mod run;

use crate::cli::Command;
use crate::config::Config;
use crate::context::ProjectContext;
use crate::error::Result;
use crate::events::{Event, append_event};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => run::cmd_run(args),
        Command::Rollback(args) => rollback::cmd_rollback(args),
        Command::Inspect(args) => inspect::cmd_inspect(args),
    }
}

/// Append an audit event if the project has event logging enabled.
///
/// Logging is best-effort: the removal or restore it describes has already
/// happened, so a failure only prints a warning.
fn log_event(ctx: &ProjectContext, config: &Config, event: Event) {
    if !config.log_events {
        return;
    }

    if let Err(e) = append_event(ctx, &event) {
        eprintln!("Warning: failed to log {} event: {}", event.action, e);
    }
}
