//! Typed commands against a live mock backend.

mod common;

use chrono::NaiveDate;
use client::SessionStore;
use common::spawn_backend;
use shared::models::{
    ApprovalDecision, ExpenseFilter, ExpenseRequest, ExpenseStatus, PageQuery, SignUpRequest,
    UserProfile,
};

#[tokio::test]
async fn public_auth_commands() {
    let backend = spawn_backend().await;
    let (api, _storage) = backend.client();

    let registered = api
        .auth()
        .sign_up(&SignUpRequest {
            username: "sam".into(),
            full_name: "Sam Doe".into(),
            email: "sam@example.com".into(),
            password: "secret1".into(),
        })
        .await
        .unwrap();
    assert_eq!(registered.message, "User registered successfully!");

    let forgot = api.auth().forgot_password(" sam@example.com ").await.unwrap();
    assert_eq!(forgot.message, "Password reset email sent to sam@example.com");

    let reset = api.auth().reset_password("reset-1", "new-secret").await.unwrap();
    assert_eq!(reset.message, "Password reset successful");

    let invalid = api.auth().reset_password("other", "new-secret").await.unwrap_err();
    assert_eq!(invalid.user_message(), "Invalid or expired token");
}

#[tokio::test]
async fn expense_commands() {
    let backend = spawn_backend().await;
    let (api, _storage) = backend.client();

    let filter = ExpenseFilter {
        status: Some(ExpenseStatus::Draft),
        search: Some("  ".into()),
        ..ExpenseFilter::default()
    };
    let page = api.expenses().list(&filter, PageQuery::new(2, 5)).await.unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[1].status, ExpenseStatus::Approved);
    assert_eq!(
        backend.state.requests_to("/api/expenses")[0].query.as_deref(),
        Some("status=DRAFT&page=2&size=5")
    );

    let request = ExpenseRequest {
        title: "Hotel".into(),
        description: None,
        amount: 210.0,
        currency: "EUR".into(),
        category: "Travel".into(),
        expense_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
    };
    let created = api.expenses().create(&request).await.unwrap();
    assert_eq!(created.title, "Hotel");

    let updated = api
        .expenses()
        .update(created.id, &ExpenseRequest {
            amount: 99.5,
            ..request
        })
        .await
        .unwrap();
    assert!((updated.amount - 99.5).abs() < f64::EPSILON);

    let submitted = api.expenses().submit(created.id).await.unwrap();
    assert_eq!(submitted.status, ExpenseStatus::Pending);

    api.expenses().delete(created.id).await.unwrap();
    let methods: Vec<String> = backend
        .state
        .requests_to("/api/expenses/3")
        .into_iter()
        .map(|request| request.method)
        .collect();
    assert_eq!(methods, vec!["PUT", "DELETE"]);
}

#[tokio::test]
async fn own_approval_requests_cannot_be_decided() {
    let backend = spawn_backend().await;
    backend.state.set_user_roles(&["ROLE_MANAGER"]);
    let (api, _storage) = backend.client();
    let store = SessionStore::new(api.clone());
    store
        .login("abc123", &client::Claims::new("Jane Doe", vec!["ROLE_MANAGER".into()]))
        .await
        .unwrap();
    let me: UserProfile = store.snapshot().user.unwrap();

    let queue = api.approvals().pending(PageQuery::default()).await.unwrap();
    let decidable: Vec<bool> = queue
        .content
        .iter()
        .map(|request| request.can_decide(&me))
        .collect();
    assert_eq!(decidable, vec![false, true]);

    let approved = api
        .approvals()
        .approve(2, &ApprovalDecision::with_comment("Receipts attached"))
        .await
        .unwrap();
    assert_eq!(
        approved.expense.description.as_deref(),
        Some("Receipts attached")
    );
}

#[tokio::test]
async fn notification_and_invoice_commands() {
    let backend = spawn_backend().await;
    let (api, _storage) = backend.client();

    assert_eq!(api.notifications().unread_count().await.unwrap(), 3);
    api.notifications().mark_all_read().await.unwrap();

    let pdf = api.invoices().download(12).await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));
    assert_eq!(pdf, b"%PDF-1.4 invoice 12");
}
