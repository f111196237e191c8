//! Reactive data layer between `aruwatch-api` and UI consumers.
//!
//! This crate owns the business logic and domain model for the aruwatch
//! workspace:
//!
//! - **[`Monitor`]** — Central facade managing the full lifecycle:
//!   [`start()`](Monitor::start) begins the fixed-period polling feed for a
//!   network profile, producing full-replace snapshots of the client list.
//!   Mutations ([`rename_hostname()`](Monitor::rename_hostname),
//!   [`set_whitelist()`](Monitor::set_whitelist)) are role-gated and patch
//!   the in-memory snapshot only after the portal confirms.
//!
//! - **[`SessionStore`]** — Lock-free reactive storage (`DashMap` +
//!   `tokio::sync::watch`) keyed by client IP. Each poll replaces the whole
//!   snapshot; there is no per-row merge across polls.
//!
//! - **[`SessionStream`]** — Subscription handle vended by the store.
//!   Exposes `current()` / `latest()` / `changed()` for reactive rendering.
//!
//! - **[`view`]** — Pure filter/sort transformation of a snapshot into the
//!   rendered table order, and **[`derive`]** — pure computation of display
//!   fields (floor from AP name, connect timestamp from duration).
//!
//! - **[`SessionGate`]** — Read-only holder of the operator [`Role`]
//!   obtained from the portal login. Role is the sole authority for
//!   mutations; every entry point re-checks it.

pub mod derive;
pub mod error;
pub mod model;
pub mod monitor;
mod recovery;
pub mod session;
pub mod store;
pub mod stream;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use monitor::{DataState, Monitor, MonitorConfig, MutationStatus};
pub use session::{Role, SessionGate};
pub use store::SessionStore;
pub use stream::SessionStream;
pub use view::{SortConfig, SortDirection, SortKey};

// Re-export model types at the crate root for ergonomics.
pub use model::{ClientSession, NetworkProfile, Whitelist};

// Transport types come from the api crate; re-exported so consumers
// rarely need a direct aruwatch-api dependency.
pub use aruwatch_api::{PortalClient, TlsMode, TransportConfig};
