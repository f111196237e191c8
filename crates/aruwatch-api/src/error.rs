use thiserror::Error;

/// Top-level error type for the `aruwatch-api` crate.
///
/// Covers every failure mode at the portal boundary: login, transport,
/// and portal-level rejections. `aruwatch-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Portal ──────────────────────────────────────────────────────
    /// The portal rejected a request. `message` is the server-supplied
    /// `{"error": "..."}` body when present, or a generic HTTP summary.
    #[error("Portal error (HTTP {status}): {message}")]
    Portal { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next poll tick.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Portal { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The server-supplied rejection message, if this error carries one.
    pub fn portal_message(&self) -> Option<&str> {
        match self {
            Self::Portal { message, .. } => Some(message),
            _ => None,
        }
    }
}
