//! Shared helpers for command handlers.

use aruwatch_core::{Monitor, MutationStatus};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Turn a mutation outcome into a CLI result. `Denied` comes from the
/// role gate refusing before any request was issued.
pub fn require_applied(status: MutationStatus, operation: &str) -> Result<(), CliError> {
    match status {
        MutationStatus::Applied => Ok(()),
        MutationStatus::Denied => Err(CliError::PermissionDenied {
            operation: operation.into(),
        }),
    }
}

/// Require a client with this IP in the current snapshot.
pub fn require_client(monitor: &Monitor, ip: &str) -> Result<(), CliError> {
    if monitor.store().session_by_ip(ip).is_none() {
        return Err(CliError::ClientNotFound { ip: ip.into() });
    }
    Ok(())
}
