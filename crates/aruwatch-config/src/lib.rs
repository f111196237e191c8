//! Shared configuration for the aruwatch CLI.
//!
//! TOML profiles, credential resolution (env + plaintext), and
//! translation to `aruwatch_core::MonitorConfig`. The CLI adds
//! flag-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use aruwatch_core::{MonitorConfig, TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for portal '{portal}'")]
    NoCredentials { portal: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default portal name.
    pub default_portal: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named portal entries.
    #[serde(default)]
    pub portals: HashMap<String, Portal>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_portal: Some("default".into()),
            defaults: Defaults::default(),
            portals: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Network profile polled when no `--network` flag is given.
    #[serde(default = "default_network")]
    pub network: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Poll period in seconds for `clients watch`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            network: default_network(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_network() -> String {
    "spatium".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    55
}

/// A named portal entry.
#[derive(Debug, Deserialize, Serialize)]
pub struct Portal {
    /// Portal base URL (e.g., "http://10.0.0.5:5000").
    pub url: String,

    /// Username for portal login. Anonymous (observer) access works
    /// without one — list and watch, no mutations.
    pub username: Option<String>,

    /// Password (plaintext — prefer the env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "aruwatch", "aruwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("aruwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path (tests and `--config` overrides).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ARUWATCH_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve login credentials for a portal, or `None` for anonymous
/// (observer) access.
///
/// Password resolution order: the portal's `password_env` variable,
/// then `ARUWATCH_PASSWORD`, then plaintext in the config file.
pub fn resolve_credentials(
    portal: &Portal,
    portal_name: &str,
) -> Result<Option<(String, SecretString)>, ConfigError> {
    let Some(username) = portal
        .username
        .clone()
        .or_else(|| std::env::var("ARUWATCH_USERNAME").ok())
    else {
        return Ok(None);
    };

    if let Some(ref env_name) = portal.password_env {
        if let Ok(pw) = std::env::var(env_name) {
            return Ok(Some((username, SecretString::from(pw))));
        }
    }

    if let Ok(pw) = std::env::var("ARUWATCH_PASSWORD") {
        return Ok(Some((username, SecretString::from(pw))));
    }

    if let Some(ref pw) = portal.password {
        return Ok(Some((username, SecretString::from(pw.clone()))));
    }

    Err(ConfigError::NoCredentials {
        portal: portal_name.into(),
    })
}

// ── Translation to core config ──────────────────────────────────────

/// Build a `MonitorConfig` from a portal entry — no CLI flag overrides.
pub fn portal_to_monitor_config(
    portal: &Portal,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let url: url::Url = portal.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", portal.url),
    })?;

    let tls = if portal.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = portal.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let mut cfg = MonitorConfig::new(url);
    cfg.transport = TransportConfig {
        tls,
        timeout: Duration::from_secs(portal.timeout.unwrap_or(defaults.timeout)),
    };
    cfg.poll_interval = Duration::from_secs(defaults.poll_interval);
    Ok(cfg)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample_portal() -> Portal {
        Portal {
            url: "http://10.0.0.5:5000".into(),
            username: Some("ops".into()),
            password: Some("plaintext".into()),
            password_env: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        }
    }

    #[test]
    fn loads_portals_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
default_portal = "lab"

[defaults]
network = "guest"
poll_interval = 30

[portals.lab]
url = "http://10.0.0.5:5000"
username = "ops"
"#
        )
        .unwrap();

        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.default_portal.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.network, "guest");
        assert_eq!(cfg.defaults.poll_interval, 30);
        assert_eq!(cfg.portals["lab"].username.as_deref(), Some("ops"));
    }

    #[test]
    fn missing_username_means_anonymous() {
        let mut portal = sample_portal();
        portal.username = None;
        // ARUWATCH_USERNAME may not leak in from the test environment.
        assert!(std::env::var("ARUWATCH_USERNAME").is_err());
        assert!(resolve_credentials(&portal, "lab").unwrap().is_none());
    }

    #[test]
    fn plaintext_password_is_last_resort() {
        let portal = sample_portal();
        let (user, _pw) = resolve_credentials(&portal, "lab").unwrap().unwrap();
        assert_eq!(user, "ops");
    }

    #[test]
    fn username_without_any_password_is_an_error() {
        let mut portal = sample_portal();
        portal.password = None;
        assert!(matches!(
            resolve_credentials(&portal, "lab"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn monitor_config_carries_tls_and_timing() {
        let mut portal = sample_portal();
        portal.insecure = Some(true);
        portal.timeout = Some(5);

        let cfg = portal_to_monitor_config(&portal, &Defaults::default()).unwrap();
        assert_eq!(cfg.portal_url.as_str(), "http://10.0.0.5:5000/");
        assert_eq!(cfg.transport.timeout, Duration::from_secs(5));
        assert!(matches!(cfg.transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(cfg.poll_interval, Duration::from_secs(55));
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let mut portal = sample_portal();
        portal.url = "not a url".into();
        assert!(matches!(
            portal_to_monitor_config(&portal, &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }
}
