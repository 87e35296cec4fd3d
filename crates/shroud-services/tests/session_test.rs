mod helpers;

use helpers::{grant, profile, FakeService};
use shroud_api_client::ServiceApi;
use shroud_core::{AuthError, ClientError, Profile, Session, TransportError, ValidationError};
use shroud_services::{
    FileTokenStore, MemoryTokenStore, SessionManager, SessionState, TokenStore,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn manager(api: &Arc<FakeService>) -> (SessionManager, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let service: Arc<dyn ServiceApi> = api.clone();
    let dyn_store: Arc<dyn TokenStore> = store.clone();
    (SessionManager::new(service, dyn_store), store)
}

#[tokio::test]
async fn login_fetches_profile_with_issued_token() {
    let api = Arc::new(FakeService::happy());
    let (mut session, _) = manager(&api);

    let established = session.login("a@b.com", "secret1").await.unwrap();

    assert_eq!(
        established,
        Session {
            token: "tok123".into(),
            profile: Profile {
                name: "A".into(),
                email: "a@b.com".into(),
            },
        }
    );
    assert_eq!(session.current_token(), Some("tok123"));
    assert_eq!(
        api.last_profile_token.lock().unwrap().as_deref(),
        Some("tok123")
    );
    assert_eq!(api.login_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.profile_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn login_success_always_yields_non_empty_session() {
    let cases = [
        ("a@b.com", "secret1", "t1", "A", "a@b.com"),
        ("someone@example.org", "p", "a.b.c", "Someone", "someone@example.org"),
        ("x@y.io", "longer password", "T", "Иван", "x@y.io"),
    ];

    for (email, password, token, name, profile_email) in cases {
        let api = Arc::new(FakeService::happy());
        api.set_login(Ok(grant(token)));
        api.set_profile(Ok(profile(name, profile_email)));
        let (mut session, _) = manager(&api);

        let established = session.login(email, password).await.unwrap();
        assert!(!established.token.is_empty());
        assert!(!established.profile.name.is_empty());
        assert!(!established.profile.email.is_empty());
    }
}

#[tokio::test]
async fn profile_failure_exposes_no_partial_session() {
    let api = Arc::new(FakeService::happy());
    api.set_profile(Err(ClientError::server(404, "User not found")));
    let (mut session, _) = manager(&api);

    let err = session.login("a@b.com", "secret1").await.unwrap_err();

    assert_eq!(err, ClientError::server(404, "User not found"));
    assert_eq!(session.current_token(), None);
    assert_eq!(session.state(), &SessionState::Anonymous);
}

#[tokio::test]
async fn login_errors_are_classified() {
    let api = Arc::new(FakeService::happy());
    let (mut session, _) = manager(&api);

    api.set_login(Err(ClientError::from(AuthError::InvalidCredentials(None))));
    let err = session.login("a@b.com", "wrong12").await.unwrap_err();
    assert_eq!(err.login_message(), "Login failed: Invalid email or password");

    api.set_login(Err(ClientError::from(TransportError::Unreachable(
        "connection refused".into(),
    ))));
    let err = session.login("a@b.com", "secret1").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Unreachable(_))
    ));

    // the profile call is never issued after a failed credential exchange
    assert_eq!(api.profile_calls.load(Ordering::SeqCst), 0);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn empty_token_is_rejected() {
    let api = Arc::new(FakeService::happy());
    api.set_login(Ok(grant("   ")));
    let (mut session, _) = manager(&api);

    let err = session.login("a@b.com", "secret1").await.unwrap_err();
    assert!(matches!(err, ClientError::Unknown(_)));
    assert_eq!(api.profile_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_with_mismatched_passwords_makes_no_calls() {
    let inputs = [
        ("secret1", "secret2"),
        ("abcdef", "abcdeF"),
        ("x", "y"),
        ("long enough", ""),
    ];

    for (password, confirm) in inputs {
        let api = Arc::new(FakeService::happy());
        let (mut session, _) = manager(&api);

        let err = session
            .register("A", "a@b.com", password, confirm)
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::Validation(ValidationError::PasswordMismatch));
        assert_eq!(api.total_calls(), 0);
    }
}

#[tokio::test]
async fn register_with_short_password_makes_no_calls() {
    for password in ["", "a", "abc", "12345"] {
        let api = Arc::new(FakeService::happy());
        let (mut session, _) = manager(&api);

        let err = session
            .register("A", "a@b.com", password, password)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::PasswordTooShort { min: 6 })
                | ClientError::Validation(ValidationError::MissingField("password"))
        ));
        assert_eq!(api.total_calls(), 0);
    }
}

#[tokio::test]
async fn register_then_fetch_profile() {
    let api = Arc::new(FakeService::happy());
    let (mut session, _) = manager(&api);

    let established = session
        .register("A", "a@b.com", "secret1", "secret1")
        .await
        .unwrap();

    assert_eq!(established.token, "tok123");
    assert_eq!(api.register_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.profile_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn register_surfaces_service_detail() {
    let api = Arc::new(FakeService::happy());
    api.set_register(Err(ClientError::server(400, "Email already registered")));
    let (mut session, _) = manager(&api);

    let err = session
        .register("A", "a@b.com", "secret1", "secret1")
        .await
        .unwrap_err();

    assert_eq!(
        err.registration_message(),
        "Registration failed: Email already registered"
    );
}

#[tokio::test]
async fn logout_is_idempotent() {
    let api = Arc::new(FakeService::happy());
    let (mut session, store) = manager(&api);
    session.login("a@b.com", "secret1").await.unwrap();
    session.save().await.unwrap();

    session.logout();
    assert_eq!(session.current_token(), None);
    session.logout();
    assert_eq!(session.current_token(), None);
    assert_eq!(session.state(), &SessionState::Anonymous);

    session.save().await.unwrap();
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn token_survives_reload_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let api = Arc::new(FakeService::happy());
    let service: Arc<dyn ServiceApi> = api.clone();

    {
        let mut session = SessionManager::load(
            Arc::clone(&service),
            Arc::new(FileTokenStore::new(&path)),
        )
        .await
        .unwrap();
        assert_eq!(session.state(), &SessionState::Anonymous);
        session.login("a@b.com", "secret1").await.unwrap();
        session.save().await.unwrap();
    }

    let mut restored = SessionManager::load(
        Arc::clone(&service),
        Arc::new(FileTokenStore::new(&path)),
    )
    .await
    .unwrap();
    assert_eq!(
        restored.state(),
        &SessionState::Restored {
            token: "tok123".into()
        }
    );
    assert_eq!(restored.current_token(), Some("tok123"));
    assert!(restored.session().is_none());

    let refreshed = restored.refresh_profile().await.unwrap();
    assert_eq!(refreshed.profile.name, "A");
    assert!(restored.session().is_some());

    // the password and profile never reach storage
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("secret1"));
    assert!(!raw.contains("a@b.com"));
}

#[tokio::test]
async fn refresh_with_expired_token_tears_down() {
    let api = Arc::new(FakeService::happy());
    api.set_profile(Err(ClientError::from(AuthError::SessionExpired)));
    let service: Arc<dyn ServiceApi> = api.clone();
    let mut session = SessionManager::load(
        service,
        Arc::new(MemoryTokenStore::with_token("stale")),
    )
    .await
    .unwrap();

    let err = session.refresh_profile().await.unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(session.current_token(), None);
}

#[tokio::test]
async fn refresh_requires_a_token() {
    let api = Arc::new(FakeService::happy());
    let (mut session, _) = manager(&api);

    let err = session.refresh_profile().await.unwrap_err();
    assert!(matches!(err, ClientError::PreconditionFailed(_)));
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn invalid_email_makes_no_calls() {
    let api = Arc::new(FakeService::happy());
    let (mut session, _) = manager(&api);

    let err = session.login("nobody", "secret1").await.unwrap_err();
    assert_eq!(err, ClientError::Validation(ValidationError::InvalidEmail));
    assert_eq!(api.total_calls(), 0);
}

#[tokio::test]
async fn blank_stored_token_loads_as_anonymous() {
    let api = Arc::new(FakeService::happy());
    let service: Arc<dyn ServiceApi> = api.clone();
    let session = SessionManager::load(service, Arc::new(MemoryTokenStore::with_token(" \n")))
        .await
        .unwrap();

    assert_eq!(session.state(), &SessionState::Anonymous);
    assert_eq!(session.current_token(), None);
}
