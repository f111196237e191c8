//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and config errors into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use aruwatch_config::ConfigError;
use aruwatch_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to portal at {url}")]
    #[diagnostic(
        code(aruwatch::connection_failed),
        help(
            "Check that the portal is running and accessible.\n\
             URL: {url}\n\
             Try: aruwatch networks --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(aruwatch::auth_failed),
        help(
            "Verify the username and password for this portal.\n\
             Password is read from ARUWATCH_PASSWORD or the config file."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for portal '{portal}'")]
    #[diagnostic(
        code(aruwatch::no_credentials),
        help(
            "Configure credentials with: aruwatch config init\n\
             Or set ARUWATCH_USERNAME and ARUWATCH_PASSWORD."
        )
    )]
    NoCredentials { portal: String },

    #[error("'{operation}' requires the admin role")]
    #[diagnostic(
        code(aruwatch::permission_denied),
        help(
            "The portal reported a non-admin role for this login.\n\
             Read-only commands (list, watch) remain available."
        )
    )]
    PermissionDenied { operation: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("client '{ip}' not found in the current snapshot")]
    #[diagnostic(
        code(aruwatch::not_found),
        help("Run: aruwatch clients list to see connected clients")
    )]
    ClientNotFound { ip: String },

    // ── Portal ───────────────────────────────────────────────────────
    #[error("Portal rejected the operation: {message}")]
    #[diagnostic(code(aruwatch::rejected))]
    Rejected { message: String },

    /// Unexpected portal behavior (e.g. a response body that does not
    /// parse) — distinct from an explicit rejection.
    #[error("Internal error: {message}")]
    #[diagnostic(
        code(aruwatch::internal),
        help("The portal answered in an unexpected format. Re-run with -vv for details.")
    )]
    Internal { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(aruwatch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Portal entry '{name}' not found in configuration")]
    #[diagnostic(
        code(aruwatch::portal_not_found),
        help(
            "Available portals: {available}\n\
             Create one with: aruwatch config init"
        )
    )]
    PortalNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(aruwatch::no_config),
        help(
            "Create one with: aruwatch config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(aruwatch::config))]
    Config(#[from] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::ClientNotFound { .. } | Self::PortalNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_not_reported_as_rejections() {
        let err = CliError::from(CoreError::Internal("unexpected body".into()));
        assert!(matches!(err, CliError::Internal { .. }));
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn exit_codes_match_error_classes() {
        let denied = CliError::PermissionDenied {
            operation: "clients rename".into(),
        };
        assert_eq!(denied.exit_code(), exit_code::PERMISSION);

        let rejected = CliError::from(CoreError::Rejected {
            message: "device not found".into(),
        });
        assert_eq!(rejected.exit_code(), exit_code::GENERAL);

        let validation = CliError::from(CoreError::ValidationFailed {
            message: "hostname cannot be empty".into(),
        });
        assert_eq!(validation.exit_code(), exit_code::USAGE);
    }
}
