//! CLI configuration — thin wrapper around `aruwatch_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--url, --username, etc.).

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use strum::IntoEnumIterator;

use aruwatch_core::{MonitorConfig, NetworkProfile, TlsMode};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use aruwatch_config::{
    Config, Defaults, Portal, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active portal entry name from CLI flags and config.
pub fn active_portal_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .portal
        .clone()
        .or_else(|| config.default_portal.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the network profile to poll (flag > env > config default).
pub fn resolve_network(global: &GlobalOpts, config: &Config) -> Result<NetworkProfile, CliError> {
    let raw = global
        .network
        .clone()
        .unwrap_or_else(|| config.defaults.network.clone());

    NetworkProfile::from_str(&raw).map_err(|_| {
        let known: Vec<_> = NetworkProfile::iter().map(|p| p.label().to_lowercase()).collect();
        CliError::Validation {
            field: "network".into(),
            reason: format!("unknown profile '{raw}'. Valid values: {}", known.join(", ")),
        }
    })
}

/// Translate a `Portal` entry + global flags into a `MonitorConfig`.
///
/// CLI flag overrides take priority over config values.
pub fn resolve_portal(portal: &Portal, global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let url_str = global.url.as_deref().unwrap_or(&portal.url);
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let tls = if global.insecure || portal.insecure.unwrap_or(false) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = portal.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let mut cfg = MonitorConfig::new(url);
    cfg.transport.tls = tls;
    cfg.transport.timeout = Duration::from_secs(portal.timeout.unwrap_or(global.timeout));
    Ok(cfg)
}

/// Build a `MonitorConfig` from CLI flags alone — no config file entry.
pub fn config_from_flags(global: &GlobalOpts) -> Result<MonitorConfig, CliError> {
    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let mut cfg = MonitorConfig::new(url);
    cfg.transport.tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };
    cfg.transport.timeout = Duration::from_secs(global.timeout);
    Ok(cfg)
}

/// Resolve login credentials, honoring the `--username` flag override.
/// `Ok(None)` means anonymous (observer) access.
pub fn resolve_credentials_with_flags(
    portal: Option<&Portal>,
    portal_name: &str,
    global: &GlobalOpts,
) -> Result<Option<(String, SecretString)>, CliError> {
    // Flag username wins; its password still comes from the usual chain.
    if let Some(ref username) = global.username {
        if let Ok(pw) = std::env::var("ARUWATCH_PASSWORD") {
            return Ok(Some((username.clone(), SecretString::from(pw))));
        }
        if let Some(p) = portal {
            if let Some(ref pw) = p.password {
                return Ok(Some((username.clone(), SecretString::from(pw.clone()))));
            }
        }
        return Err(CliError::NoCredentials {
            portal: portal_name.into(),
        });
    }

    match portal {
        Some(p) => Ok(aruwatch_config::resolve_credentials(p, portal_name)?),
        None => Ok(None),
    }
}
