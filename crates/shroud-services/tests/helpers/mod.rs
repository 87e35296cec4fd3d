//! Scripted in-memory service used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use shroud_api_client::ServiceApi;
use shroud_core::{
    AccessGrant, ClientError, Credentials, ProcessedImage, Profile, RegistrationRequest,
    SourceFile,
};
use shroud_services::{MemoryTokenStore, SessionManager, TokenStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ORIGIN: &str = "http://localhost:8000";

pub enum UploadBehavior {
    Respond(Result<ProcessedImage, ClientError>),
    /// Never answers.
    Hang,
}

pub struct FakeService {
    pub login_result: Mutex<Result<AccessGrant, ClientError>>,
    pub register_result: Mutex<Result<AccessGrant, ClientError>>,
    pub profile_result: Mutex<Result<Profile, ClientError>>,
    pub upload_behavior: Mutex<UploadBehavior>,
    pub login_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub last_upload_token: Mutex<Option<String>>,
    pub last_profile_token: Mutex<Option<String>>,
}

impl FakeService {
    /// Accepts every call: token `tok123`, profile `A <a@b.com>`, two regions redacted.
    pub fn happy() -> Self {
        Self {
            login_result: Mutex::new(Ok(grant("tok123"))),
            register_result: Mutex::new(Ok(grant("tok123"))),
            profile_result: Mutex::new(Ok(profile("A", "a@b.com"))),
            upload_behavior: Mutex::new(UploadBehavior::Respond(Ok(processed(
                "/static/out.jpg",
                2,
            )))),
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            last_upload_token: Mutex::new(None),
            last_profile_token: Mutex::new(None),
        }
    }

    pub fn set_login(&self, result: Result<AccessGrant, ClientError>) {
        *self.login_result.lock().unwrap() = result;
    }

    pub fn set_register(&self, result: Result<AccessGrant, ClientError>) {
        *self.register_result.lock().unwrap() = result;
    }

    pub fn set_profile(&self, result: Result<Profile, ClientError>) {
        *self.profile_result.lock().unwrap() = result;
    }

    pub fn set_upload(&self, behavior: UploadBehavior) {
        *self.upload_behavior.lock().unwrap() = behavior;
    }

    pub fn total_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
            + self.register_calls.load(Ordering::SeqCst)
            + self.profile_calls.load(Ordering::SeqCst)
            + self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceApi for FakeService {
    async fn login(&self, _credentials: &Credentials) -> Result<AccessGrant, ClientError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        self.login_result.lock().unwrap().clone()
    }

    async fn register(&self, _request: &RegistrationRequest) -> Result<AccessGrant, ClientError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        self.register_result.lock().unwrap().clone()
    }

    async fn profile(&self, token: &str) -> Result<Profile, ClientError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_profile_token.lock().unwrap() = Some(token.to_string());
        self.profile_result.lock().unwrap().clone()
    }

    async fn upload(&self, token: &str, _file: &SourceFile) -> Result<ProcessedImage, ClientError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_upload_token.lock().unwrap() = Some(token.to_string());

        let scripted = match &*self.upload_behavior.lock().unwrap() {
            UploadBehavior::Respond(result) => Some(result.clone()),
            UploadBehavior::Hang => None,
        };

        match scripted {
            Some(result) => result,
            None => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(ClientError::unknown("hung transfer woke up"))
            }
        }
    }

    fn resolve_url(&self, location: &str) -> String {
        format!("{}{}", ORIGIN, location)
    }
}

pub fn grant(token: &str) -> AccessGrant {
    AccessGrant {
        access_token: token.to_string(),
        token_type: Some("bearer".to_string()),
    }
}

pub fn profile(name: &str, email: &str) -> Profile {
    Profile {
        name: name.to_string(),
        email: email.to_string(),
    }
}

pub fn processed(url: &str, faces: u32) -> ProcessedImage {
    ProcessedImage {
        processed_url: url.to_string(),
        faces_detected: faces,
        message: None,
        original_filename: None,
        processed_filename: None,
        status: None,
    }
}

pub fn jpeg(size: usize) -> SourceFile {
    SourceFile::new("photo.jpg", "image/jpeg", vec![0xABu8; size])
}

/// Session manager that is already signed in as `A <a@b.com>` with `tok123`.
pub async fn signed_in(api: &Arc<FakeService>) -> SessionManager {
    let service: Arc<dyn ServiceApi> = api.clone();
    let store: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let mut session = SessionManager::new(service, store);
    session.login("a@b.com", "secret1").await.unwrap();
    session
}
