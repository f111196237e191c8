// ── Core error types ──
//
// User-facing errors from aruwatch-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly. The
// `From<aruwatch_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach portal at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// Blocked client-side before any request was issued.
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// The portal rejected a mutation. `message` is the server-supplied
    /// reason when present, a generic fallback otherwise. Local state is
    /// left exactly as before the attempt.
    #[error("Rejected by portal: {message}")]
    Rejected { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<aruwatch_api::Error> for CoreError {
    fn from(err: aruwatch_api::Error) -> Self {
        match err {
            aruwatch_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            aruwatch_api::Error::Transport(ref e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".to_owned(), ToString::to_string),
                reason: e.to_string(),
            },
            aruwatch_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            aruwatch_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            aruwatch_api::Error::Portal { message, .. } => CoreError::Rejected { message },
            aruwatch_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
