//! Constants shared by the client crates.

use std::time::Duration;

/// Service origin used when no `SHROUD_API_URL` is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Upper bound for a single upload transfer. Enforced by the upload controller.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Default ceiling for every other request.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Key under which the bearer token is persisted.
pub const TOKEN_STORAGE_KEY: &str = "token";

/// Multipart field name expected by `POST /upload/`.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// API paths (trailing slash is part of the service contract).
pub const LOGIN_PATH: &str = "/login/";
pub const REGISTER_PATH: &str = "/register/";
pub const PROFILE_PATH: &str = "/profile/";
pub const UPLOAD_PATH: &str = "/upload/";
pub const HEALTH_PATH: &str = "/";
