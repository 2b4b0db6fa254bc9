//! In-process mock of the expense backend for client tests.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    rc::Rc,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use client::{ApiClient, MemoryStorage};
use serde_json::{Value, json};
use shared::models::{LoginRequest, UpdateProfileRequest};
use tokio::net::TcpListener;
use url::Url;

pub const CSRF_ROUTE: &str = "/api/auth/csrf";

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub csrf: Option<String>,
}

#[derive(Debug)]
pub struct BackendState {
    requests: Mutex<Vec<Recorded>>,
    csrf_fetches: AtomicUsize,
    csrf_unavailable: AtomicBool,
    user_status: Mutex<StatusCode>,
    user_roles: Mutex<Vec<String>>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            csrf_fetches: AtomicUsize::new(0),
            csrf_unavailable: AtomicBool::new(false),
            user_status: Mutex::new(StatusCode::OK),
            user_roles: Mutex::new(vec!["ROLE_USER".to_string()]),
        }
    }
}

impl BackendState {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests other than anti-forgery token fetches.
    pub fn api_requests(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path != CSRF_ROUTE)
            .collect()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    pub fn csrf_fetches(&self) -> usize {
        self.csrf_fetches.load(Ordering::SeqCst)
    }

    pub fn set_csrf_unavailable(&self, unavailable: bool) {
        self.csrf_unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn set_user_status(&self, status: StatusCode) {
        *self.user_status.lock().unwrap() = status;
    }

    pub fn set_user_roles(&self, roles: &[&str]) {
        *self.user_roles.lock().unwrap() = roles.iter().map(ToString::to_string).collect();
    }

    fn roles(&self) -> Vec<String> {
        self.user_roles.lock().unwrap().clone()
    }
}

#[derive(Debug)]
pub struct Backend {
    pub url: Url,
    pub state: Arc<BackendState>,
}

impl Backend {
    /// A client talking to this backend, with fresh in-memory storage.
    pub fn client(&self) -> (ApiClient, Rc<MemoryStorage>) {
        let storage = Rc::new(MemoryStorage::new());
        (ApiClient::new(self.url.clone(), storage.clone()), storage)
    }
}

pub async fn spawn_backend() -> Backend {
    let state = Arc::new(BackendState::default());
    let app = Router::new()
        .route(CSRF_ROUTE, get(csrf))
        .route("/api/auth/public/sign-in", post(sign_in))
        .route("/api/auth/public/sign-up", post(sign_up))
        .route("/api/auth/public/forgot-password", post(forgot_password))
        .route("/api/auth/public/reset-password", post(reset_password))
        .route("/api/auth/user", get(current_user))
        .route("/api/users", put(update_profile))
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route(
            "/api/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/api/expenses/{id}/submit", post(submit_expense))
        .route("/api/approvals/pending", get(pending_approvals))
        .route("/api/approvals/{id}/approve", post(approve))
        .route("/api/notifications/unread-count", get(unread_count))
        .route("/api/notifications/read-all", put(no_content))
        .route("/api/invoices/{id}/pdf", get(invoice_pdf))
        .route("/api/admin/users", get(admin_users))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Backend {
        url: Url::parse(&format!("http://{addr}/")).unwrap(),
        state,
    }
}

/// Unsigned token with the given claims payload.
pub fn fake_jwt(payload: &Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

async fn record(State(state): State<Arc<BackendState>>, request: Request, next: Next) -> Response {
    let recorded = {
        let header_value = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        Recorded {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            authorization: header_value("authorization"),
            csrf: header_value("x-xsrf-token"),
        }
    };
    state.requests.lock().unwrap().push(recorded);
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message, "details": null }))).into_response()
}

async fn csrf(State(state): State<Arc<BackendState>>) -> Response {
    let fetch = state.csrf_fetches.fetch_add(1, Ordering::SeqCst) + 1;
    tokio::time::sleep(Duration::from_millis(25)).await;
    if state.csrf_unavailable.load(Ordering::SeqCst) {
        return error(StatusCode::SERVICE_UNAVAILABLE, "csrf unavailable");
    }
    Json(json!({
        "token": format!("csrf-{fetch}"),
        "headerName": "X-XSRF-TOKEN",
        "parameterName": "_csrf"
    }))
    .into_response()
}

async fn sign_in(Json(credentials): Json<LoginRequest>) -> Response {
    if credentials.password != "secret" {
        return error(StatusCode::UNAUTHORIZED, "Bad credentials");
    }
    let token = fake_jwt(&json!({
        "sub": credentials.username,
        "roles": "ROLE_MANAGER,ROLE_USER",
        "exp": 4_102_444_800_i64
    }));
    Json(json!({
        "jwtToken": token,
        "username": credentials.username,
        "roles": ["ROLE_MANAGER", "ROLE_USER"]
    }))
    .into_response()
}

async fn sign_up() -> &'static str {
    "User registered successfully!"
}

async fn forgot_password(Form(form): Form<HashMap<String, String>>) -> Response {
    match form.get("email") {
        Some(email) if !email.is_empty() => {
            Json(json!({ "message": format!("Password reset email sent to {email}") }))
                .into_response()
        }
        _ => error(StatusCode::BAD_REQUEST, "Email is required"),
    }
}

async fn reset_password(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("token").map(String::as_str) == Some("reset-1")
        && form.get("newPassword").is_some_and(|password| password.len() >= 6)
    {
        Json(json!({ "message": "Password reset successful" })).into_response()
    } else {
        error(StatusCode::BAD_REQUEST, "Invalid or expired token")
    }
}

fn profile(state: &BackendState) -> Value {
    json!({
        "id": 7,
        "username": "jane",
        "fullName": "Jane Doe",
        "email": "jane@example.com",
        "roles": state.roles(),
        "enabled": true
    })
}

async fn current_user(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    if !headers.contains_key(header::AUTHORIZATION) {
        return error(StatusCode::UNAUTHORIZED, "Full authentication is required");
    }
    let status = *state.user_status.lock().unwrap();
    if status != StatusCode::OK {
        return error(status, "current user unavailable");
    }
    Json(profile(&state)).into_response()
}

async fn update_profile(
    State(state): State<Arc<BackendState>>,
    Json(request): Json<UpdateProfileRequest>,
) -> Json<Value> {
    let mut updated = profile(&state);
    updated["fullName"] = json!(request.full_name);
    updated["email"] = json!(request.email);
    Json(updated)
}

fn expense(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "title": "Client dinner",
        "description": "Quarterly review",
        "amount": 120.5,
        "currency": "USD",
        "category": "Meals",
        "expenseDate": "2025-02-02",
        "status": status,
        "submittedBy": { "id": 9, "fullName": "Sam Submitter" },
        "createdAt": "2025-02-03T10:00:00Z"
    })
}

fn page(content: Vec<Value>) -> Value {
    let total = content.len();
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": 1,
        "number": 0,
        "size": 10
    })
}

async fn list_expenses() -> Json<Value> {
    Json(page(vec![expense(1, "DRAFT"), expense(2, "APPROVED")]))
}

async fn create_expense(Json(body): Json<Value>) -> Response {
    let mut created = expense(3, "DRAFT");
    created["title"] = body["title"].clone();
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_expense(Path(id): Path<i64>) -> Response {
    match id {
        401 => error(StatusCode::UNAUTHORIZED, "Token expired"),
        // Slow rejection, for racing a stale credential against a new sign-in.
        4010 => {
            tokio::time::sleep(Duration::from_millis(150)).await;
            error(StatusCode::UNAUTHORIZED, "Token expired")
        }
        403 => error(StatusCode::FORBIDDEN, "Access denied"),
        500 => error(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable"),
        id => Json(expense(id, "DRAFT")).into_response(),
    }
}

async fn update_expense(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let mut updated = expense(id, "DRAFT");
    updated["amount"] = body["amount"].clone();
    Json(updated)
}

async fn delete_expense(Path(_id): Path<i64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn submit_expense(Path(id): Path<i64>) -> Json<Value> {
    Json(expense(id, "PENDING"))
}

fn approval(id: i64, requester: i64) -> Value {
    json!({
        "id": id,
        "expense": expense(id * 10, "PENDING"),
        "requester": { "id": requester, "fullName": "Requester" },
        "level": "MANAGER",
        "status": "PENDING",
        "createdAt": "2025-02-04T09:30:00Z"
    })
}

async fn pending_approvals() -> Json<Value> {
    Json(page(vec![approval(1, 7), approval(2, 9)]))
}

async fn approve(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let mut approved = approval(id, 9);
    approved["status"] = json!("APPROVED");
    approved["expense"]["description"] = body["comment"].clone();
    Json(approved)
}

async fn unread_count() -> Json<Value> {
    Json(json!({ "count": 3 }))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn invoice_pdf(Path(id): Path<i64>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        format!("%PDF-1.4 invoice {id}").into_bytes(),
    )
        .into_response()
}

async fn admin_users(State(state): State<Arc<BackendState>>) -> Response {
    if state.roles().iter().any(|role| role == "ROLE_ADMIN") {
        Json(json!([profile(&state)])).into_response()
    } else {
        error(StatusCode::FORBIDDEN, "Access denied")
    }
}
