//! Session manager
//!
//! Owns the authentication state. The token lives in a single in-memory field;
//! durable storage is only touched by the explicit `load`/`save` pair at process
//! boundaries.

use shroud_api_client::{log_error, ServiceApi};
use shroud_core::validation::{validate_credentials, validate_registration};
use shroud_core::{
    AccessGrant, ClientError, Credentials, Profile, RegistrationRequest, Session,
};
use std::fmt;
use std::sync::Arc;

use super::token_store::{StoreResult, TokenStore};

#[derive(Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    /// Token read from storage whose profile has not been fetched yet.
    Restored { token: String },
    Authenticated(Session),
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Anonymous => f.write_str("Anonymous"),
            SessionState::Restored { .. } => f.write_str("Restored"),
            SessionState::Authenticated(session) => f
                .debug_tuple("Authenticated")
                .field(&session.profile)
                .finish(),
        }
    }
}

pub struct SessionManager {
    api: Arc<dyn ServiceApi>,
    store: Arc<dyn TokenStore>,
    state: SessionState,
}

impl SessionManager {
    /// Anonymous manager. Storage is not read.
    pub fn new(api: Arc<dyn ServiceApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: SessionState::Anonymous,
        }
    }

    /// Build a manager from durable storage. A stored token yields `Restored`.
    ///
    /// The stored token is trimmed; a blank one counts as absent.
    pub async fn load(
        api: Arc<dyn ServiceApi>,
        store: Arc<dyn TokenStore>,
    ) -> StoreResult<Self> {
        let stored = store
            .load()
            .await?
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let state = match stored {
            Some(token) => {
                tracing::debug!("Restored token from storage");
                SessionState::Restored { token }
            }
            None => SessionState::Anonymous,
        };

        Ok(Self { api, store, state })
    }

    /// Write the current token to durable storage, or remove it when anonymous.
    pub async fn save(&self) -> StoreResult<()> {
        match self.current_token() {
            Some(token) => self.store.save(token).await,
            None => self.store.clear().await,
        }
    }

    /// Exchange credentials for a token, then fetch the profile.
    ///
    /// The session is only replaced once both calls succeed. On failure the
    /// previous state is left untouched.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Session, ClientError> {
        let credentials = Credentials::new(email.trim(), password);
        validate_credentials(&credentials).inspect_err(|e| {
            tracing::debug!(error = %e, "Login rejected locally");
        })?;

        let grant = self
            .api
            .login(&credentials)
            .await
            .inspect_err(|e| log_error("login", e))?;

        self.establish(grant).await
    }

    /// Validate locally, create the account, then fetch the profile.
    ///
    /// A mismatched confirmation or a short password fails before any request.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Session, ClientError> {
        let request = RegistrationRequest::new(name.trim(), email.trim(), password, confirm_password);
        validate_registration(&request)?;

        let grant = self
            .api
            .register(&request)
            .await
            .inspect_err(|e| log_error("register", e))?;

        self.establish(grant).await
    }

    /// Fetch the profile for the held token, promoting a restored session.
    ///
    /// An expired token tears the session down.
    pub async fn refresh_profile(&mut self) -> Result<Session, ClientError> {
        let token = self
            .current_token()
            .map(str::to_string)
            .ok_or_else(|| ClientError::precondition("Not signed in"))?;

        match self.fetch_profile(&token).await {
            Ok(profile) => {
                let session = Session { token, profile };
                self.state = SessionState::Authenticated(session.clone());
                Ok(session)
            }
            Err(e) => {
                if e.is_session_expired() {
                    self.logout();
                }
                Err(e)
            }
        }
    }

    /// Discard the session. Idempotent.
    pub fn logout(&mut self) {
        if self.state != SessionState::Anonymous {
            tracing::info!("Session closed");
        }
        self.state = SessionState::Anonymous;
    }

    /// Tear down the session only if it still holds `token`.
    ///
    /// Used when a request made with `token` was rejected; a session established
    /// with a newer token in the meantime stays untouched.
    pub fn invalidate(&mut self, token: &str) {
        if self.current_token() == Some(token) {
            tracing::warn!("Token rejected by the service, closing session");
            self.logout();
        }
    }

    pub fn current_token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Anonymous => None,
            SessionState::Restored { token } => Some(token),
            SessionState::Authenticated(session) => Some(&session.token),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }

    async fn establish(&mut self, grant: AccessGrant) -> Result<Session, ClientError> {
        let token = grant.access_token.trim().to_string();
        if token.is_empty() {
            return Err(ClientError::unknown("Service returned an empty access token"));
        }

        let profile = self.fetch_profile(&token).await?;
        let session = Session { token, profile };

        tracing::info!(email = %session.profile.email, "Session established");
        self.state = SessionState::Authenticated(session.clone());
        Ok(session)
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ClientError> {
        let profile = self
            .api
            .profile(token)
            .await
            .inspect_err(|e| log_error("profile", e))?;

        if profile.name.trim().is_empty() || profile.email.trim().is_empty() {
            return Err(ClientError::unknown("Service returned an incomplete profile"));
        }

        Ok(profile)
    }
}

