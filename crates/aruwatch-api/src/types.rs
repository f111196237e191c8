// Wire types for the portal API.
//
// These mirror the JSON the portal emits verbatim. Canonical domain
// types (with parsed derived fields) live in `aruwatch-core`.

use serde::{Deserialize, Serialize};

/// One client session row as returned by `GET /users?profile=...`.
///
/// The portal computes `hostname` (edited name wins over the controller
/// name) and the `health` whitelist sentinel server-side; everything else
/// is passed through from the Aruba user-table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSession {
    pub ip: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub band: Option<String>,
    #[serde(default)]
    pub ssid: Option<String>,
    #[serde(default)]
    pub ap_name: Option<String>,
    /// Connection age as `d:h:m` or `h:m`.
    #[serde(default)]
    pub duration: Option<String>,
    /// Whitelist sentinel: `"✅"` when whitelisted, `"❌"` otherwise.
    #[serde(default)]
    pub health: Option<String>,
}

/// Response body of a successful `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub role: String,
}

/// Body of `POST /edit-hostname`.
#[derive(Debug, Clone, Serialize)]
pub struct EditHostnameRequest<'a> {
    pub ip: &'a str,
    pub hostname: &'a str,
}

/// Body of `POST /add-whitelist` and `POST /unwhitelist`.
#[derive(Debug, Clone, Serialize)]
pub struct WhitelistRequest<'a> {
    pub ip: &'a str,
}

/// Error body the portal attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct PortalErrorBody {
    pub error: Option<String>,
}
