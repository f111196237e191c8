// Portal HTTP client
//
// Wraps `reqwest::Client` with portal-specific URL construction and
// error-body handling. The portal speaks plain JSON: arrays for reads,
// `{"message": ...}` acks for writes, `{"error": ...}` on rejection.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{EditHostnameRequest, PortalErrorBody, RawSession, WhitelistRequest};

/// Raw HTTP client for the Wi-Fi monitoring portal.
///
/// All methods return the decoded JSON payload; non-2xx responses are
/// turned into [`Error::Portal`] carrying the server-supplied message
/// when the body parses as `{"error": "..."}`.
#[derive(Clone)]
pub struct PortalClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PortalClient {
    /// Create a new portal client from a `TransportConfig`.
    ///
    /// `base_url` is the portal root, e.g. `http://10.0.0.5:5000`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a portal client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The portal base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Fetch the full client list for one network profile.
    ///
    /// `GET /users?profile={profile_id}`. The result is a total snapshot —
    /// callers replace, never merge.
    pub async fn list_sessions(&self, profile_id: &str) -> Result<Vec<RawSession>, Error> {
        let mut url = self.endpoint("users")?;
        url.query_pairs_mut().append_pair("profile", profile_id);
        self.get(url).await
    }

    /// Persist a hostname edit for the row keyed by `ip`.
    ///
    /// `POST /edit-hostname` with `{ip, hostname}`.
    pub async fn edit_hostname(&self, ip: &str, hostname: &str) -> Result<(), Error> {
        let url = self.endpoint("edit-hostname")?;
        self.post_ack(url, &EditHostnameRequest { ip, hostname })
            .await
    }

    /// Add `ip` to the whitelist. `POST /add-whitelist` with `{ip}`.
    pub async fn add_whitelist(&self, ip: &str) -> Result<(), Error> {
        let url = self.endpoint("add-whitelist")?;
        self.post_ack(url, &WhitelistRequest { ip }).await
    }

    /// Remove `ip` from the whitelist. `POST /unwhitelist` with `{ip}`.
    pub async fn remove_whitelist(&self, ip: &str) -> Result<(), Error> {
        let url = self.endpoint("unwhitelist")?;
        self.post_ack(url, &WhitelistRequest { ip }).await
    }

    // ── URL / request helpers ────────────────────────────────────────

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Raw JSON POST, for auth flows that handle the response themselves.
    pub(crate) async fn http_post_json(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<reqwest::Response, reqwest::Error> {
        debug!("POST {}", url);
        self.http.post(url).json(body).send().await
    }

    /// Send a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::decode_body(resp).await
    }

    /// Send a POST request with a JSON body, expecting a 2xx ack.
    ///
    /// The ack body (`{"message": ...}`) is discarded; rejections surface
    /// the portal's error message.
    async fn post_ack(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::portal_error(status, resp).await)
    }

    /// Decode a 2xx JSON body, or map the failure to [`Error::Portal`].
    async fn decode_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::portal_error(status, resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    /// Build an [`Error::Portal`] from a non-2xx response, preferring the
    /// `{"error": "..."}` body message over a generic HTTP summary.
    async fn portal_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PortalErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| format!("HTTP {status}: {}", body_preview(&body)));

        if status == reqwest::StatusCode::UNAUTHORIZED {
            Error::Authentication { message }
        } else {
            Error::Portal {
                status: status.as_u16(),
                message,
            }
        }
    }
}

const PREVIEW_LIMIT: usize = 200;

/// Clip a body for error messages. The cut point backs up to the nearest
/// char boundary so a multibyte sequence (the portal is fond of emoji)
/// never gets split.
pub(crate) fn body_preview(body: &str) -> &str {
    let mut end = body.len().min(PREVIEW_LIMIT);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
