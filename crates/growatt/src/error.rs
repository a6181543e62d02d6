//! CLI error types with miette diagnostics.
//!
//! Maps gateway failures into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use growatt_config::ConfigError;
use growatt_core::{ErrorCode, Failure, GatewayError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("No Growatt credentials configured")]
    #[diagnostic(
        code(growatt::missing_credentials),
        help(
            "Set GROWATT_USERNAME and GROWATT_PASSWORD, pass --username,\n\
             or add [account] to the config file (see: growatt config path)."
        )
    )]
    MissingCredentials,

    #[error("{message}")]
    #[diagnostic(
        code(growatt::auth_failed),
        help("Verify the username and password for server.growatt.com.")
    )]
    AuthFailed { message: String },

    // ── Transport ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(growatt::connection_failed),
        help(
            "Check network access to the Growatt server.\n\
             Override the server with --base-url, or raise --timeout."
        )
    )]
    ConnectionFailed { message: String },

    #[error("{message}")]
    #[diagnostic(
        code(growatt::unexpected_format),
        help("The server answered with data this version does not understand. Run with -vv for details.")
    )]
    UnexpectedFormat { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(growatt::not_found), help("Run: growatt plants to see available plants"))]
    NotFound { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(growatt::invalid_parameters))]
    InvalidParameters { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(growatt::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(growatt::config),
        help("Check the config file: growatt config path")
    )]
    Config(#[from] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingCredentials | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::InvalidParameters { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::UnexpectedFormat { .. } | Self::Config(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── Failure → CliError mapping ───────────────────────────────────────

impl From<Failure> for CliError {
    fn from(failure: Failure) -> Self {
        let message = failure.error;
        match failure.code {
            ErrorCode::MissingCredentials => Self::MissingCredentials,
            ErrorCode::AuthenticationFailed => Self::AuthFailed { message },
            ErrorCode::TransportError => Self::ConnectionFailed { message },
            ErrorCode::ParameterError => Self::InvalidParameters { message },
            ErrorCode::NotFound => Self::NotFound { message },
            ErrorCode::UnexpectedFormat => Self::UnexpectedFormat { message },
        }
    }
}

impl From<GatewayError> for CliError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Config { message } => Self::Validation {
                field: "server".into(),
                reason: message,
            },
            other => Failure::new(&other, false).into(),
        }
    }
}
