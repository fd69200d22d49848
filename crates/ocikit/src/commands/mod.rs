//! Command dispatch: bridges CLI args -> SDK clients -> output formatting.

pub mod config_cmd;
pub mod lb;
pub mod rm;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match cmd {
        Command::Lb(args) => lb::handle(resolved, args, global).await,
        Command::Rm(args) => rm::handle(resolved, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    };

    // The SDK does not know which profile supplied the credentials
    result.map_err(|err| match err {
        CliError::AuthFailed {
            status, request_id, ..
        } => CliError::AuthFailed {
            status,
            profile: resolved.name.clone(),
            request_id,
        },
        other => other,
    })
}
