//! Maps transport outcomes onto the `ClientError` taxonomy.
//!
//! This is the only place that inspects status codes, error bodies, and reqwest
//! error kinds. Everything downstream matches on `ClientError` variants.

use reqwest::StatusCode;
use shroud_core::{AuthError, ClientError, TransportError};
use std::fmt;

/// Service call being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    Register,
    Profile,
    Upload,
    Health,
    Download,
}

impl Endpoint {
    /// Credential exchanges answer 401 for bad credentials rather than a stale token.
    pub fn is_credential_exchange(&self) -> bool {
        matches!(self, Endpoint::Login | Endpoint::Register)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Endpoint::Login => "login",
            Endpoint::Register => "register",
            Endpoint::Profile => "profile",
            Endpoint::Upload => "upload",
            Endpoint::Health => "health",
            Endpoint::Download => "download",
        };
        f.write_str(s)
    }
}

/// Classify a non-2xx response.
pub fn status_error(endpoint: Endpoint, status: StatusCode, body: &str) -> ClientError {
    let detail = extract_detail(body);

    if status == StatusCode::UNAUTHORIZED {
        return if endpoint.is_credential_exchange() {
            ClientError::from(AuthError::InvalidCredentials(detail))
        } else {
            ClientError::from(AuthError::SessionExpired)
        };
    }

    let detail = detail.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });
    ClientError::server(status.as_u16(), detail)
}

/// Classify a failure that produced no usable response.
pub fn transport_error(endpoint: Endpoint, error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        return ClientError::from(TransportError::Timeout);
    }
    if error.is_connect() {
        return ClientError::from(TransportError::Unreachable(error.to_string()));
    }
    if error.is_decode() || error.is_body() {
        return ClientError::unknown(format!(
            "Failed to read {} response: {}",
            endpoint, error
        ));
    }
    if error.is_request() {
        return ClientError::from(TransportError::Unreachable(error.to_string()));
    }
    ClientError::unknown(error.to_string())
}

/// Pull the service-provided detail out of an error body.
///
/// `{"detail": "..."}` yields the string, structured details are rendered as JSON,
/// other bodies are used as plain text. Empty bodies yield `None`.
pub fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(serde_json::Value::Null) | None => Some(trimmed.to_string()),
            Some(other) => Some(other.to_string()),
        },
        _ => Some(trimmed.to_string()),
    }
}
