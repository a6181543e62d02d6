// ── Gateway error types ──
//
// Domain errors from the session gateway. Consumers never see HTTP
// status codes or JSON parse failures directly: the `From<growatt_api::Error>`
// impl folds transport-layer errors into six stable codes.

use serde::Serialize;
use thiserror::Error;

/// Machine-readable failure code carried by every gateway failure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingCredentials,
    AuthenticationFailed,
    TransportError,
    ParameterError,
    NotFound,
    UnexpectedFormat,
}

impl ErrorCode {
    /// Hint suitable for showing to an end user as-is.
    pub fn ui_message(self) -> &'static str {
        match self {
            Self::MissingCredentials => {
                "Growatt username or password is not configured. Set GROWATT_USERNAME and GROWATT_PASSWORD."
            }
            Self::AuthenticationFailed => {
                "Could not sign in to Growatt. Check the username and password."
            }
            Self::TransportError => {
                "The Growatt server could not be reached. Please try again later."
            }
            Self::ParameterError => "The request was rejected by the Growatt server.",
            Self::NotFound => "The requested item does not exist on this account.",
            Self::UnexpectedFormat => {
                "The Growatt server returned data in an unexpected format."
            }
        }
    }
}

/// Unified error type for the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Username and password are both required")]
    MissingCredentials,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Invalid parameters: {message}")]
    Parameter { message: String },

    #[error("{resource} not found: {identifier}")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },

    #[error("Unexpected response format: {message}")]
    UnexpectedFormat { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingCredentials => ErrorCode::MissingCredentials,
            Self::AuthenticationFailed { .. } => ErrorCode::AuthenticationFailed,
            Self::Transport { .. } | Self::Config { .. } => ErrorCode::TransportError,
            Self::Parameter { .. } => ErrorCode::ParameterError,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::UnexpectedFormat { .. } => ErrorCode::UnexpectedFormat,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<growatt_api::Error> for GatewayError {
    fn from(err: growatt_api::Error) -> Self {
        use growatt_api::Error as Api;

        match err {
            Api::Authentication { message } => Self::AuthenticationFailed { message },
            Api::SessionExpired | Api::NotLoggedIn => Self::AuthenticationFailed {
                message: err.to_string(),
            },
            Api::InvalidParameters { message } => Self::Parameter { message },
            Api::Transport(ref e) => Self::Transport {
                message: if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    e.to_string()
                },
            },
            Api::InvalidUrl(_) | Api::Tls(_) => Self::Config {
                message: err.to_string(),
            },
            Api::Api { message, .. } => Self::Transport { message },
            Api::Deserialization { message, body: _ } => Self::UnexpectedFormat { message },
        }
    }
}
