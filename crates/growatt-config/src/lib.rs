//! Configuration for the Growatt monitor.
//!
//! TOML file + `GROWATT_` environment variables, credential resolution
//! (env + keyring + plaintext), and translation to
//! `growatt_core::GatewayConfig`. The CLI layers flag overrides on top.

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

use growatt_core::{Credentials, GatewayConfig, TlsVerification};

/// Keyring service name for stored passwords.
pub const KEYRING_SERVICE: &str = "growatt-monitor";

pub const ENV_USERNAME: &str = "GROWATT_USERNAME";
pub const ENV_PASSWORD: &str = "GROWATT_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
///
/// ```toml
/// [server]
/// base_url = "https://server.growatt.com/"
/// timeout = 30
///
/// [account]
/// username = "me@example.com"
///
/// [web]
/// bind = "127.0.0.1:8080"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Plaintext password (prefer keyring or `GROWATT_PASSWORD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_base_url() -> String {
    growatt_core::config::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_bind() -> String {
    "127.0.0.1:8080".into()
}

impl Config {
    /// Copy with the plaintext password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.account.password.is_some() {
            copy.account.password = Some("********".into());
        }
        copy
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "growatt", "growatt-monitor").map_or_else(
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
    p.push("growatt-monitor");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields defaults.
///
/// Nested keys use a double underscore: `GROWATT_SERVER__TIMEOUT=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GROWATT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Username from the file, then `GROWATT_USERNAME`.
pub fn resolve_username(account: &AccountConfig) -> Option<String> {
    account
        .username
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| std::env::var(ENV_USERNAME).ok())
}

/// Password from `GROWATT_PASSWORD`, then the keyring, then the file.
pub fn resolve_password(account: &AccountConfig, username: &str) -> Option<SecretString> {
    // 1. Env var
    if let Ok(pw) = std::env::var(ENV_PASSWORD) {
        return Some(SecretString::from(pw));
    }

    // 2. Keyring
    if !username.is_empty() {
        if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{username}/password")) {
            if let Ok(pw) = entry.get_password() {
                return Some(SecretString::from(pw));
            }
        }
    }

    // 3. Plaintext in config
    account.password.clone().map(SecretString::from)
}

/// Resolve both credentials. Missing values become empty strings; the
/// gateway reports them at login time.
pub fn resolve_credentials(account: &AccountConfig) -> Credentials {
    let username = resolve_username(account).unwrap_or_default();
    let password =
        resolve_password(account, &username).unwrap_or_else(|| SecretString::from(String::new()));
    Credentials { username, password }
}

/// Build a `GatewayConfig` from the loaded file, without CLI overrides.
pub fn to_gateway_config(config: &Config) -> Result<GatewayConfig, ConfigError> {
    let base_url: url::Url =
        config
            .server
            .base_url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "server.base_url".into(),
                reason: format!("invalid URL: {}", config.server.base_url),
            })?;

    if config.server.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "server.timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let tls = if config.server.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = config.server.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(GatewayConfig {
        base_url,
        credentials: resolve_credentials(&config.account),
        tls,
        timeout: Duration::from_secs(config.server.timeout),
    })
}
