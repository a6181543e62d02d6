use thiserror::Error;

/// Top-level error type for the `growatt-api` crate.
///
/// Covers every failure mode of the vendor API: login rejection,
/// session expiry, parameter rejection, transport and decoding.
/// `growatt-core` maps these into gateway error codes.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected by the server (wrong credentials, locked account).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The server no longer recognizes the session cookie.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    /// A user-scoped call was made before a successful login.
    #[error("Not logged in -- no user id available")]
    NotLoggedIn,

    // ── Request shape ───────────────────────────────────────────────
    /// The server rejected the request parameters.
    #[error("Invalid request parameters: {message}")]
    InvalidParameters { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Error reported by the server (non-2xx status or `success: false`).
    #[error("Growatt API error: {message}")]
    Api { message: String, status: Option<u16> },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the session is gone and logging in again
    /// might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotLoggedIn)
    }

    /// Returns `true` if the server rejected the argument set.
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Self::InvalidParameters { .. })
    }
}
