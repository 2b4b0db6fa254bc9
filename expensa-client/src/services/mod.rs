//! Typed commands, one per backend operation the clients use.
//!
//! Services borrow an [`ApiClient`] and are created on demand:
//! `api.expenses().list(&filter, page).await`.

mod analytics;
mod approvals;
mod audit;
mod auth;
mod expenses;
mod invoices;
mod notifications;
mod users;

pub use analytics::AnalyticsService;
pub use approvals::ApprovalService;
pub use audit::AuditService;
pub use auth::AuthService;
pub use expenses::ExpenseService;
pub use invoices::InvoiceService;
pub use notifications::NotificationService;
pub use users::UserService;

use crate::api::ApiClient;

impl ApiClient {
    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    #[must_use]
    pub const fn expenses(&self) -> ExpenseService<'_> {
        ExpenseService::new(self)
    }

    #[must_use]
    pub const fn approvals(&self) -> ApprovalService<'_> {
        ApprovalService::new(self)
    }

    #[must_use]
    pub const fn analytics(&self) -> AnalyticsService<'_> {
        AnalyticsService::new(self)
    }

    #[must_use]
    pub const fn audit(&self) -> AuditService<'_> {
        AuditService::new(self)
    }

    #[must_use]
    pub const fn notifications(&self) -> NotificationService<'_> {
        NotificationService::new(self)
    }

    #[must_use]
    pub const fn invoices(&self) -> InvoiceService<'_> {
        InvoiceService::new(self)
    }

    #[must_use]
    pub const fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }
}
