//! Severity-aware logging of classified failures.

use shroud_core::{ClientError, LogLevel};
use std::fmt;

/// Log `error` at the level its variant calls for.
pub fn log_error(operation: impl fmt::Display, error: &ClientError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(operation = %operation, code = code, error = %error, "Operation failed");
        }
        LogLevel::Warn => {
            tracing::warn!(operation = %operation, code = code, error = %error, "Operation failed");
        }
        LogLevel::Error => {
            tracing::error!(operation = %operation, code = code, error = %error, "Operation failed");
        }
    }
}
