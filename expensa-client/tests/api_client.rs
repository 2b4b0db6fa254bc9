//! Bearer and anti-forgery handling of the API client against a live mock backend.

mod common;

use client::{
    ApiError, ApiRequest, SessionStorage,
    record::{CSRF_TOKEN_KEY, SESSION_KEY},
};
use common::spawn_backend;
use futures::future::join_all;
use reqwest::StatusCode;

#[tokio::test]
async fn concurrent_requests_share_one_csrf_fetch() {
    let backend = spawn_backend().await;
    let (api, storage) = backend.client();

    let calls = (1..=8).map(|id| {
        let api = api.clone();
        async move { api.expenses().get(id).await }
    });
    let results = join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(backend.state.csrf_fetches(), 1);
    assert_eq!(
        storage.get(CSRF_TOKEN_KEY).unwrap().as_deref(),
        Some("csrf-1")
    );
    let requests = backend.state.api_requests();
    assert_eq!(requests.len(), 8);
    assert!(
        requests
            .iter()
            .all(|request| request.csrf.as_deref() == Some("csrf-1"))
    );
}

#[tokio::test]
async fn cached_csrf_token_is_reused() {
    let backend = spawn_backend().await;
    let (api, storage) = backend.client();
    storage.set(CSRF_TOKEN_KEY, "cached").unwrap();

    api.expenses().get(1).await.unwrap();
    api.notifications().unread_count().await.unwrap();

    assert_eq!(backend.state.csrf_fetches(), 0);
    assert!(
        backend
            .state
            .api_requests()
            .iter()
            .all(|request| request.csrf.as_deref() == Some("cached"))
    );
}

#[tokio::test]
async fn authorization_header_only_with_token() {
    let backend = spawn_backend().await;
    let (api, storage) = backend.client();

    api.expenses().get(1).await.unwrap();
    storage
        .set(SESSION_KEY, r#"{"token":"abc123","isAdmin":false,"isManager":false}"#)
        .unwrap();
    api.expenses().get(2).await.unwrap();

    let requests = backend.state.api_requests();
    assert_eq!(requests[0].authorization, None);
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer abc123"));
}

#[tokio::test]
async fn csrf_failure_degrades_to_no_header() {
    let backend = spawn_backend().await;
    backend.state.set_csrf_unavailable(true);
    let (api, storage) = backend.client();

    let expense = api.expenses().get(4).await.unwrap();
    assert_eq!(expense.id, 4);
    assert!(storage.get(CSRF_TOKEN_KEY).unwrap().is_none());
    assert_eq!(backend.state.api_requests()[0].csrf, None);

    backend.state.set_csrf_unavailable(false);
    api.expenses().get(5).await.unwrap();
    assert_eq!(backend.state.csrf_fetches(), 2);
    assert_eq!(
        backend.state.api_requests()[1].csrf.as_deref(),
        Some("csrf-2")
    );
}

#[tokio::test]
async fn server_errors_leave_storage_untouched() {
    let backend = spawn_backend().await;
    let (api, storage) = backend.client();
    let record = r#"{"token":"abc123","isAdmin":true,"isManager":false}"#;
    storage.set(SESSION_KEY, record).unwrap();
    storage.set(CSRF_TOKEN_KEY, "cached").unwrap();

    let err = api.expenses().get(500).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(
        err.body().map(|body| body.message.as_str()),
        Some("Database unavailable")
    );
    assert!(!err.is_auth_failure());
    assert_eq!(storage.get(SESSION_KEY).unwrap().as_deref(), Some(record));
    assert_eq!(storage.get(CSRF_TOKEN_KEY).unwrap().as_deref(), Some("cached"));
}

#[tokio::test]
async fn auth_failure_hooks_run_once_per_401() {
    let backend = spawn_backend().await;
    let (api, storage) = backend.client();
    storage
        .set(SESSION_KEY, r#"{"token":"abc123","isAdmin":false,"isManager":false}"#)
        .unwrap();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    api.on_auth_failure(move |status, token| {
        sink.borrow_mut().push((status, token.map(str::to_string)));
    });

    let expired = api.expenses().get(401).await.unwrap_err();
    let forbidden = api.expenses().get(403).await.unwrap_err();

    assert!(expired.is_auth_failure());
    assert!(forbidden.is_forbidden());
    assert_eq!(
        *seen.borrow(),
        vec![(StatusCode::UNAUTHORIZED, Some("abc123".to_string()))]
    );
}

#[tokio::test]
async fn malformed_header_is_rejected_before_sending() {
    let backend = spawn_backend().await;
    let (api, _storage) = backend.client();

    let err = api
        .send(ApiRequest::get("api/expenses/1").header("X-Trace", "two\nlines"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidRequest(_)));
    assert!(backend.state.api_requests().is_empty());
    assert_eq!(backend.state.csrf_fetches(), 0);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let storage = std::rc::Rc::new(client::MemoryStorage::new());
    let api = client::ApiClient::new(
        url::Url::parse("http://127.0.0.1:9/").unwrap(),
        storage.clone(),
    );

    let err = api.expenses().get(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(storage.keys().is_empty());
}
