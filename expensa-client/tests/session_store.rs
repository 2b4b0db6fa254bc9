//! Session lifecycle against a live mock backend.

mod common;

use std::{cell::RefCell, rc::Rc};

use client::{
    Claims, Interest, LogoutReason, ProfileState, SessionEvent, SessionStorage, SessionStore,
    record::{
        CSRF_TOKEN_KEY, LEGACY_ADMIN_KEY, LEGACY_MANAGER_KEY, LEGACY_TOKEN_KEY, LEGACY_USER_KEY,
        SESSION_KEY,
    },
};
use common::{Backend, spawn_backend};
use reqwest::StatusCode;
use shared::models::{LoginRequest, UpdateProfileRequest};

fn store(backend: &Backend) -> (SessionStore, Rc<client::MemoryStorage>) {
    let (api, storage) = backend.client();
    (SessionStore::new(api), storage)
}

fn record_events(store: &SessionStore) -> Rc<RefCell<Vec<SessionEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    store.subscribe(move |event, _| sink.borrow_mut().push(event));
    events
}

#[tokio::test]
async fn login_persists_token_and_fetches_profile() {
    let backend = spawn_backend().await;
    backend.state.set_user_roles(&["ROLE_ADMIN"]);
    let (store, storage) = store(&backend);

    let seen_during_event = Rc::new(RefCell::new(None));
    let sink = seen_during_event.clone();
    store.subscribe(move |event, session| {
        if event == SessionEvent::LoggedIn {
            *sink.borrow_mut() = Some(session.clone());
        }
    });

    let claims = Claims::new("Jane Doe", vec!["ROLE_ADMIN".into()]);
    let session = store.login("abc123", &claims).await.unwrap();

    let at_login = seen_during_event.borrow().clone().unwrap();
    assert_eq!(at_login.token.as_deref(), Some("abc123"));
    assert!(at_login.is_admin());
    assert_eq!(at_login.display_name(), Some("Jane Doe"));

    assert_eq!(session.profile, ProfileState::Loaded);
    assert_eq!(session.user.as_ref().and_then(|user| user.id), Some(7));
    let persisted = client::PersistedSession::load(storage.as_ref()).unwrap().unwrap();
    assert_eq!(persisted.token, "abc123");
    assert!(persisted.roles.is_admin);

    let user_calls = backend.state.requests_to("/api/auth/user");
    assert_eq!(user_calls.len(), 1);
    assert_eq!(user_calls[0].authorization.as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn roles_follow_the_current_user() {
    let backend = spawn_backend().await;
    let (store, _storage) = store(&backend);

    backend.state.set_user_roles(&["ROLE_MANAGER", "ROLE_USER"]);
    let claims = Claims::new("Jane Doe", vec!["ROLE_ADMIN".into()]);
    let session = store.login("abc123", &claims).await.unwrap();
    assert!(session.is_manager());
    assert!(!session.is_admin());

    backend.state.set_user_roles(&["ROLE_USER"]);
    let session = store.refresh_profile().await.unwrap();
    assert!(!session.is_manager());
    assert!(!session.is_admin());
}

#[tokio::test]
async fn sign_in_decodes_the_returned_token() {
    let backend = spawn_backend().await;
    backend.state.set_user_roles(&["ROLE_MANAGER"]);
    let (store, _storage) = store(&backend);
    let events = record_events(&store);

    let session = store
        .sign_in(&LoginRequest {
            username: "jane".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert!(session.is_manager());
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::LoggedIn, SessionEvent::ProfileLoaded]
    );
}

#[tokio::test]
async fn bad_credentials_do_not_start_a_session() {
    let backend = spawn_backend().await;
    let (store, storage) = store(&backend);
    let events = record_events(&store);

    let err = store
        .sign_in(&LoginRequest {
            username: "jane".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert!(err.is_auth_failure());
    assert_eq!(err.user_message(), "Bad credentials");
    assert!(!store.is_authenticated());
    assert!(events.borrow().is_empty());
    assert!(storage.get(SESSION_KEY).unwrap().is_none());
}

#[tokio::test]
async fn profile_failure_keeps_session_stale() {
    let backend = spawn_backend().await;
    backend.state.set_user_status(StatusCode::INTERNAL_SERVER_ERROR);
    let (store, storage) = store(&backend);
    storage
        .set(SESSION_KEY, r#"{"token":"abc123","isAdmin":true,"isManager":false}"#)
        .unwrap();

    let err = store.initialize().await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    let session = store.snapshot();
    assert_eq!(session.token.as_deref(), Some("abc123"));
    assert!(session.is_admin());
    assert_eq!(session.profile, ProfileState::Stale);
}

#[tokio::test]
async fn rejected_credential_on_initialize_logs_out() {
    let backend = spawn_backend().await;
    backend.state.set_user_status(StatusCode::UNAUTHORIZED);
    let (store, storage) = store(&backend);
    storage
        .set(SESSION_KEY, r#"{"token":"stale","isAdmin":false,"isManager":true}"#)
        .unwrap();
    let events = record_events(&store);

    let err = store.initialize().await.unwrap_err();

    assert!(err.is_auth_failure());
    assert!(!store.is_authenticated());
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::LoggedOut(LogoutReason::Expired)]
    );
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn any_401_forces_logout_but_403_does_not() {
    let backend = spawn_backend().await;
    let (store, storage) = store(&backend);
    store
        .login("abc123", &Claims::new("Jane Doe", vec!["ROLE_USER".into()]))
        .await
        .unwrap();
    let events = record_events(&store);

    let forbidden = store.api().users().list().await.unwrap_err();
    assert!(forbidden.is_forbidden());
    assert!(store.is_authenticated());

    let expired = store.api().expenses().get(401).await.unwrap_err();
    assert!(expired.is_auth_failure());
    assert!(!store.is_authenticated());
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::LoggedOut(LogoutReason::Expired)]
    );
    assert!(storage.get(SESSION_KEY).unwrap().is_none());
    assert!(storage.get(CSRF_TOKEN_KEY).unwrap().is_none());
}

#[tokio::test]
async fn stale_rejection_does_not_end_a_newer_session() {
    let backend = spawn_backend().await;
    let (store, storage) = store(&backend);
    storage
        .set(SESSION_KEY, r#"{"token":"old-token","isAdmin":false,"isManager":false}"#)
        .unwrap();
    store.restore().unwrap();
    let events = record_events(&store);

    let relogin = async {
        tokio::time::sleep(std::time::Duration::from_millis(40)).await;
        store.logout().unwrap();
        store
            .login("new-token", &Claims::new("Jane Doe", vec!["ROLE_USER".into()]))
            .await
    };
    let expenses = store.api().expenses();
    let (stale, fresh) = tokio::join!(expenses.get(4010), relogin);

    assert!(stale.unwrap_err().is_auth_failure());
    assert_eq!(fresh.unwrap().token.as_deref(), Some("new-token"));
    assert_eq!(store.snapshot().token.as_deref(), Some("new-token"));
    assert_eq!(
        client::PersistedSession::load(storage.as_ref()).unwrap().unwrap().token,
        "new-token"
    );
    assert!(
        !events
            .borrow()
            .contains(&SessionEvent::LoggedOut(LogoutReason::Expired))
    );
    let stale_call = backend.state.requests_to("/api/expenses/4010");
    assert_eq!(stale_call[0].authorization.as_deref(), Some("Bearer old-token"));
}

#[tokio::test]
async fn forbidden_profile_on_initialize_logs_out() {
    let backend = spawn_backend().await;
    backend.state.set_user_status(StatusCode::FORBIDDEN);
    let (store, storage) = store(&backend);
    storage
        .set(SESSION_KEY, r#"{"token":"revoked","isAdmin":true,"isManager":false}"#)
        .unwrap();
    storage.set(CSRF_TOKEN_KEY, "cached").unwrap();
    let events = record_events(&store);

    let err = store.initialize().await.unwrap_err();

    assert!(err.is_forbidden());
    assert!(!store.is_authenticated());
    assert!(!store.snapshot().is_admin());
    assert_eq!(
        *events.borrow(),
        vec![SessionEvent::LoggedOut(LogoutReason::Expired)]
    );
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn logout_clears_every_artifact() {
    let backend = spawn_backend().await;
    let (store, storage) = store(&backend);
    store
        .login("abc123", &Claims::new("Jane Doe", vec!["ROLE_ADMIN".into()]))
        .await
        .unwrap();
    storage.set(LEGACY_TOKEN_KEY, "old").unwrap();
    assert!(storage.get(CSRF_TOKEN_KEY).unwrap().is_some());

    store.logout().unwrap();

    assert!(storage.keys().is_empty());
    let session = store.snapshot();
    assert!(session.token.is_none());
    assert!(!session.is_admin() && !session.is_manager());
    assert!(session.user.is_none());
}

#[tokio::test]
async fn logout_discards_a_corrupt_session_file() {
    let backend = spawn_backend().await;
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();
    let storage = Rc::new(client::FileStorage::new(&path));
    let store = SessionStore::new(client::ApiClient::new(backend.url.clone(), storage));

    assert!(store.restore().is_err());
    store.logout().unwrap();

    assert!(!path.exists());
    assert!(!store.is_authenticated());
    assert!(store.restore().unwrap().token.is_none());
}

#[tokio::test]
async fn legacy_keys_are_migrated_on_initialize() {
    let backend = spawn_backend().await;
    backend.state.set_user_roles(&["ROLE_MANAGER"]);
    let (store, storage) = store(&backend);
    storage.set(LEGACY_TOKEN_KEY, "legacy-token").unwrap();
    storage
        .set(LEGACY_USER_KEY, r#"{"fullName":"Jane Doe","roles":["ROLE_MANAGER"]}"#)
        .unwrap();
    storage.set(LEGACY_ADMIN_KEY, "false").unwrap();
    storage.set(LEGACY_MANAGER_KEY, "true").unwrap();

    let session = store.initialize().await.unwrap();

    assert_eq!(session.token.as_deref(), Some("legacy-token"));
    assert!(session.is_manager());
    assert_eq!(
        backend.state.requests_to("/api/auth/user")[0]
            .authorization
            .as_deref(),
        Some("Bearer legacy-token")
    );
    for key in [LEGACY_TOKEN_KEY, LEGACY_USER_KEY, LEGACY_ADMIN_KEY, LEGACY_MANAGER_KEY] {
        assert!(storage.get(key).unwrap().is_none(), "{key} should be gone");
    }
}

#[tokio::test]
async fn saved_profile_replaces_cached_user() {
    let backend = spawn_backend().await;
    backend.state.set_user_roles(&["ROLE_ADMIN"]);
    let (store, _storage) = store(&backend);
    store
        .login("abc123", &Claims::new("Jane Doe", vec!["ROLE_ADMIN".into()]))
        .await
        .unwrap();
    let events = record_events(&store);

    let updated = store
        .save_profile(&UpdateProfileRequest {
            full_name: "Jane Q. Doe".into(),
            email: "jq@example.com".into(),
            password: None,
        })
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Jane Q. Doe");
    let session = store.snapshot();
    assert_eq!(session.display_name(), Some("Jane Q. Doe"));
    assert_eq!(session.token.as_deref(), Some("abc123"));
    assert!(session.is_admin());
    assert_eq!(*events.borrow(), vec![SessionEvent::ProfileUpdated]);
}

#[tokio::test]
async fn cancelled_interest_drops_late_results() {
    let backend = spawn_backend().await;
    let (api, _storage) = backend.client();
    let interest = Interest::new();
    let view = interest.clone();

    let expenses = api.expenses();
    let guarded = interest.guard(expenses.get(1));
    view.cancel();

    assert!(guarded.await.is_none());
    assert_eq!(backend.state.api_requests().len(), 1);
}
