//! Service contract and its HTTP implementation.
//!
//! | Call     | Method/Path      | Auth   | Success body                      |
//! |----------|------------------|--------|-----------------------------------|
//! | Login    | POST /login/     | none   | `{access_token}`                  |
//! | Register | POST /register/  | none   | `{access_token}`                  |
//! | Profile  | GET /profile/    | Bearer | `{name, email}`                   |
//! | Upload   | POST /upload/    | Bearer | `{processed_url, faces_detected}` |

use async_trait::async_trait;
use bytes::Bytes;
use shroud_core::constants::UPLOAD_FIELD_NAME;
use shroud_core::{
    AccessGrant, ClientError, Credentials, ProcessedImage, Profile, RegistrationRequest,
    SourceFile,
};

use crate::{ApiClient, Endpoint};

/// Operations the session and upload layers need from the remote service.
///
/// Implementations classify every failure into `ClientError` before returning.
#[async_trait]
pub trait ServiceApi: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<AccessGrant, ClientError>;

    /// Create an account and receive a bearer token.
    async fn register(&self, request: &RegistrationRequest) -> Result<AccessGrant, ClientError>;

    /// Fetch the profile the token belongs to.
    async fn profile(&self, token: &str) -> Result<Profile, ClientError>;

    /// Submit an image for processing. No timeout is applied here beyond the
    /// client's general ceiling; callers bound the transfer themselves.
    async fn upload(&self, token: &str, file: &SourceFile) -> Result<ProcessedImage, ClientError>;

    /// Resolve a service-relative location (e.g. `processed_url`) against the origin.
    fn resolve_url(&self, location: &str) -> String;
}

/// Body of `GET /`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

#[async_trait]
impl ServiceApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AccessGrant, ClientError> {
        let request = self
            .client()
            .post(self.build_url(shroud_core::constants::LOGIN_PATH))
            .json(credentials);
        self.execute(Endpoint::Login, request).await
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<AccessGrant, ClientError> {
        let request = self
            .client()
            .post(self.build_url(shroud_core::constants::REGISTER_PATH))
            .json(request);
        self.execute(Endpoint::Register, request).await
    }

    async fn profile(&self, token: &str) -> Result<Profile, ClientError> {
        let request = self
            .client()
            .get(self.build_url(shroud_core::constants::PROFILE_PATH));
        let request = self.apply_auth(request, token);
        self.execute(Endpoint::Profile, request).await
    }

    async fn upload(&self, token: &str, file: &SourceFile) -> Result<ProcessedImage, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.data.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| {
                ClientError::unknown(format!(
                    "Invalid content type {}: {}",
                    file.content_type, e
                ))
            })?;
        let form = reqwest::multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let request = self
            .client()
            .post(self.build_url(shroud_core::constants::UPLOAD_PATH))
            .multipart(form);
        let request = self.apply_auth(request, token);
        self.execute(Endpoint::Upload, request).await
    }

    fn resolve_url(&self, location: &str) -> String {
        self.resolve(location)
    }
}

impl ApiClient {
    /// Check that the service answers. Returns its greeting message.
    pub async fn ping(&self) -> Result<HealthResponse, ClientError> {
        let request = self
            .client()
            .get(self.build_url(shroud_core::constants::HEALTH_PATH));
        self.execute(Endpoint::Health, request).await
    }

    /// Download a processed asset. `location` may be relative to the origin.
    pub async fn download(&self, location: &str) -> Result<Bytes, ClientError> {
        let request = self.client().get(self.resolve(location));
        let response = self.dispatch(Endpoint::Download, request).await?;
        response
            .bytes()
            .await
            .map_err(|e| crate::classify::transport_error(Endpoint::Download, e))
    }
}
