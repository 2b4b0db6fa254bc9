//! Wire models for the Expensa backend REST contract.
//!
//! Everything except [`auth`] and [`user`] is display data: the clients render
//! it as returned and never derive state from it.

pub mod analytics;
pub mod approval;
pub mod audit;
pub mod auth;
pub mod errors;
pub mod expense;
pub mod invoice;
pub mod notification;
pub mod page;
pub mod user;

pub use analytics::{AnalyticsSummary, CategoryTotal, DateRange, MonthlyTotal, StatusCount};
pub use approval::{ApprovalDecision, ApprovalLevel, ApprovalRequest, ApprovalStatus};
pub use audit::{AuditEntry, AuditFilter};
pub use auth::{
    CsrfTokenResponse, LoginRequest, LoginResponse, MessageResponse, Role, RoleFlags,
    SignUpRequest, UpdateProfileRequest,
};
pub use errors::ErrorResponse;
pub use expense::{Expense, ExpenseFilter, ExpenseRequest, ExpenseStatus};
pub use invoice::{Invoice, InvoiceStatus};
pub use notification::{Notification, NotificationKind};
pub use page::{Page, PageQuery};
pub use user::{UpdateRolesRequest, UpdateStatusRequest, UserProfile, UserSummary};
