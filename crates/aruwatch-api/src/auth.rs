// Portal authentication
//
// The portal owns the user database; login returns the operator's role
// as a plain string. No session cookie is involved — the portal trusts
// the management LAN, and the role value gates mutations client-side.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::PortalClient;
use crate::error::Error;
use crate::types::LoginResponse;

impl PortalClient {
    /// Authenticate with the portal using username/password.
    ///
    /// `POST /login` with `{username, password}`. On success the portal
    /// returns `{message, username, role}`; the role string is the sole
    /// authority for whether mutations are permitted.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.endpoint("login")?;

        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http_post_json(url, &body)
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| format!("login failed (HTTP {status})"));
            return Err(Error::Authentication { message });
        }

        let text = resp.text().await.map_err(Error::Transport)?;
        let login: LoginResponse = serde_json::from_str(&text).map_err(|e| {
            let preview = crate::client::body_preview(&text);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: text.clone(),
            }
        })?;

        debug!(role = %login.role, "login successful");
        Ok(login)
    }
}
