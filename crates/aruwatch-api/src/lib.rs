//! Async HTTP client for the Aruba Wi-Fi monitoring portal.
//!
//! The portal is a thin JSON facade over the Aruba controller's user-table:
//! it serves the per-profile client list and accepts hostname edits and
//! whitelist changes. This crate owns the wire contracts only — domain
//! logic lives in `aruwatch-core`.
//!
//! - **[`PortalClient`]** — request/response plumbing for every endpoint:
//!   `GET /users`, `POST /edit-hostname`, `POST /add-whitelist`,
//!   `POST /unwhitelist`, and the session login.
//! - **[`TransportConfig`]** — shared TLS / timeout settings for building
//!   the underlying `reqwest::Client`.
//! - **[`Error`]** — transport and portal failure taxonomy. Portal
//!   rejections carry the server-supplied `{"error": "..."}` message.

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::PortalClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{LoginResponse, RawSession};
