//! Error types module
//!
//! Every failure the client can observe is mapped onto the closed `ClientError`
//! taxonomy exactly once, right after the network call (or local check) that
//! produced it. Callers match on the variants instead of probing response shapes.

use crate::constants::MIN_PASSWORD_LENGTH;

/// Severity a failure is logged at. See `ClientError::log_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caught before any request was sent.
    Debug,
    /// The user can act on it (sign in again, retry, fix the input).
    Warn,
    /// Service-side or unclassified failure.
    Error,
}

/// Local, pre-network validation failures. Never contact the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Empty file")]
    EmptyFile,
}

impl ValidationError {
    pub fn password_too_short() -> Self {
        ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        }
    }
}

/// Authentication failures. Recoverable by re-authenticating.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The service rejected the submitted credentials. Carries the service detail if any.
    #[error("Invalid credentials")]
    InvalidCredentials(Option<String>),

    /// The bearer token is no longer accepted.
    #[error("Session expired")]
    SessionExpired,
}

/// Transport-level failures. Recoverable by retrying the same operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Service unreachable: {0}")]
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Non-2xx response other than an authorization failure.
    #[error("Server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    /// The operation was not attempted because its preconditions do not hold.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ClientError {
    pub fn server(status: u16, detail: impl Into<String>) -> Self {
        ClientError::Server {
            status,
            detail: detail.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        ClientError::PreconditionFailed(message.into())
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        ClientError::Unknown(message.into())
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::Auth(AuthError::SessionExpired))
    }

    /// Machine-readable error code (e.g., "SESSION_EXPIRED")
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(ValidationError::PasswordMismatch) => "PASSWORD_MISMATCH",
            ClientError::Validation(ValidationError::PasswordTooShort { .. }) => {
                "PASSWORD_TOO_SHORT"
            }
            ClientError::Validation(ValidationError::MissingField(_)) => "MISSING_FIELD",
            ClientError::Validation(ValidationError::InvalidEmail) => "INVALID_EMAIL",
            ClientError::Validation(ValidationError::UnsupportedType(_)) => "UNSUPPORTED_TYPE",
            ClientError::Validation(ValidationError::EmptyFile) => "EMPTY_FILE",
            ClientError::Auth(AuthError::InvalidCredentials(_)) => "INVALID_CREDENTIALS",
            ClientError::Auth(AuthError::SessionExpired) => "SESSION_EXPIRED",
            ClientError::Transport(TransportError::Timeout) => "TIMEOUT",
            ClientError::Transport(TransportError::Unreachable(_)) => "UNREACHABLE",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            ClientError::Unknown(_) => "UNKNOWN",
        }
    }

    /// Whether the user can recover by retrying, correcting input, or signing in again.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ClientError::Unknown(_))
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            ClientError::Validation(_) | ClientError::PreconditionFailed(_) => LogLevel::Debug,
            ClientError::Auth(_) | ClientError::Transport(_) => LogLevel::Warn,
            ClientError::Server { status, .. } if *status < 500 => LogLevel::Warn,
            ClientError::Server { .. } | ClientError::Unknown(_) => LogLevel::Error,
        }
    }

    /// Human-readable status line for an upload failure.
    pub fn upload_message(&self) -> String {
        match self {
            ClientError::Auth(_) => "Authorization error. Please log in again.".to_string(),
            ClientError::Transport(TransportError::Timeout) => {
                "Request timed out. Please try again.".to_string()
            }
            ClientError::Transport(TransportError::Unreachable(_)) => {
                "Could not connect to the server.".to_string()
            }
            ClientError::Server { detail, .. } => format!("Server error: {}", detail),
            ClientError::Validation(ValidationError::UnsupportedType(_)) => {
                "Please select an image file.".to_string()
            }
            ClientError::Validation(e) => e.to_string(),
            ClientError::PreconditionFailed(message) => message.clone(),
            ClientError::Unknown(message) => format!("Error: {}", message),
        }
    }

    /// Human-readable status line for a failed login.
    pub fn login_message(&self) -> String {
        match self {
            ClientError::Validation(e) => e.to_string(),
            _ => format!(
                "Login failed: {}",
                self.service_detail()
                    .unwrap_or_else(|| "Invalid email or password".to_string())
            ),
        }
    }

    /// Human-readable status line for a failed registration.
    pub fn registration_message(&self) -> String {
        match self {
            ClientError::Validation(e) => e.to_string(),
            _ => format!(
                "Registration failed: {}",
                self.service_detail()
                    .unwrap_or_else(|| "Server error".to_string())
            ),
        }
    }

    /// Detail message provided by the service, if the error carries one.
    pub fn service_detail(&self) -> Option<String> {
        match self {
            ClientError::Server { detail, .. } => Some(detail.clone()),
            ClientError::Auth(AuthError::InvalidCredentials(detail)) => detail.clone(),
            _ => None,
        }
    }
}
