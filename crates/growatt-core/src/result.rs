// ── Normalized results ──
//
// Every gateway operation returns `GatewayResult<T>`: either an
// `Outcome` (data or an explicit "no data") or a serializable `Failure`.
// `ResponseBody` flattens both into the single JSON shape the web layer
// renders.

use serde::Serialize;

use crate::error::{ErrorCode, GatewayError};

/// Result of every gateway operation.
pub type GatewayResult<T> = Result<Outcome<T>, Failure>;

/// Successful outcome of a gateway operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Data(T),
    /// The upstream answered but had nothing to report. Not an error.
    NoData { message: String },
}

impl<T> Outcome<T> {
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::NoData {
            message: message.into(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            Self::NoData { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Data(data) => Outcome::Data(f(data)),
            Self::NoData { message } => Outcome::NoData { message },
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// Wrap a list, turning an empty one into `NoData`.
    pub fn from_list(items: Vec<T>, empty_message: &str) -> Self {
        if items.is_empty() {
            Self::no_data(empty_message)
        } else {
            Self::Data(items)
        }
    }
}

/// Structured failure returned in place of a raised error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{error}")]
pub struct Failure {
    /// Technical description of what went wrong.
    pub error: String,
    pub code: ErrorCode,
    /// End-user hint for this code.
    pub ui_message: String,
    /// Whether the gateway still holds a valid session after the failure.
    pub authenticated: bool,
}

impl Failure {
    pub fn new(err: &GatewayError, authenticated: bool) -> Self {
        let code = err.code();
        Self {
            error: err.to_string(),
            code,
            ui_message: code.ui_message().to_owned(),
            authenticated,
        }
    }
}

/// Outcome of `login` / `ensure_login`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginStatus {
    /// A fresh upstream login was performed.
    LoggedIn,
    /// The existing session was still within its timeout.
    SessionReused,
}

impl LoginStatus {
    pub fn message(self) -> &'static str {
        match self {
            Self::LoggedIn => "Logged in",
            Self::SessionReused => "Existing session reused",
        }
    }
}

/// Outcome of `logout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutStatus {
    LoggedOut,
    /// Nothing to do: no upstream session was active.
    NoActiveSession,
}

impl LogoutStatus {
    pub fn message(self) -> &'static str {
        match self {
            Self::LoggedOut => "Logged out",
            Self::NoActiveSession => "No active session",
        }
    }
}

// ── Wire shape for the web layer ─────────────────────────────────────

/// Uniform JSON body for any gateway result.
///
/// ```json
/// { "success": false, "error": "...", "code": "NOT_FOUND",
///   "ui_message": "...", "authenticated": true }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ResponseBody<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_message: Option<String>,
    pub authenticated: bool,
}

impl<T> ResponseBody<T> {
    /// Build the body for `result`. `authenticated` is used on success;
    /// failures carry their own flag.
    pub fn new(result: GatewayResult<T>, authenticated: bool) -> Self {
        match result {
            Ok(Outcome::Data(data)) => Self {
                success: true,
                data: Some(data),
                message: None,
                error: None,
                code: None,
                ui_message: None,
                authenticated,
            },
            Ok(Outcome::NoData { message }) => Self {
                success: true,
                data: None,
                message: Some(message),
                error: None,
                code: None,
                ui_message: None,
                authenticated,
            },
            Err(failure) => Self {
                success: false,
                data: None,
                message: None,
                error: Some(failure.error),
                code: Some(failure.code),
                ui_message: Some(failure.ui_message),
                authenticated: failure.authenticated,
            },
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
