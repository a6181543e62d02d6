// ── Runtime gateway configuration ──
//
// These types describe *how* to reach the Growatt server and which
// account to use. They never touch disk: the binary builds a
// `GatewayConfig` (via growatt-config) and hands it in.

use secrecy::{ExposeSecret, SecretString};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://server.growatt.com/";

/// Account credentials, immutable for the life of the gateway.
///
/// Either field may be empty; the gateway reports that as
/// `MissingCredentials` at login time rather than refusing to start.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Credentials with neither field set.
    pub fn empty() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Both username and password are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.expose_secret().is_empty()
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-hosted servers with self-signed certs).
    DangerAcceptInvalid,
}

/// Configuration for one gateway instance.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server root (e.g. `https://server.growatt.com/`).
    pub base_url: Url,
    pub credentials: Credentials,
    pub tls: TlsVerification,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: std::time::Duration,
}

impl GatewayConfig {
    pub fn new(base_url: Url, credentials: Credentials) -> Self {
        Self {
            base_url,
            credentials,
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
        }
    }
}
