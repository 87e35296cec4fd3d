//! HTTP client for the Shroud anonymization service.
//!
//! Provides a minimal reqwest client with Bearer auth and the `ServiceApi` trait
//! describing the service contract (login, register, profile, upload). Every
//! response is classified into `shroud_core::ClientError` right after the call.

pub mod api;
pub mod classify;
pub mod logging;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shroud_core::{ClientConfig, ClientError};
use std::time::Duration;

pub use api::ServiceApi;
pub use classify::Endpoint;
pub use logging::log_error;

/// HTTP client for the Shroud service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.http_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Resolve a location returned by the service against the service origin.
    /// Absolute URLs are returned unchanged.
    pub fn resolve(&self, location: &str) -> String {
        if location.starts_with("http://") || location.starts_with("https://") {
            location.to_string()
        } else {
            self.build_url(location)
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder, token: &str) -> reqwest::RequestBuilder {
        request.bearer_auth(token)
    }

    /// Send a request and deserialize a JSON success body.
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.dispatch(endpoint, request).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| classify::transport_error(endpoint, e))?;

        serde_json::from_slice(&body).map_err(|e| {
            ClientError::unknown(format!("Failed to parse {} response as JSON: {}", endpoint, e))
        })
    }

    /// Send a request and return the response if its status is a success.
    async fn dispatch(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        tracing::debug!(endpoint = %endpoint, "Sending request");

        let response = request
            .send()
            .await
            .map_err(|e| classify::transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify::status_error(endpoint, status, &body);
            tracing::debug!(
                endpoint = %endpoint,
                status = status.as_u16(),
                code = error.error_code(),
                "Service returned an error status"
            );
            return Err(error);
        }

        Ok(response)
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}
