mod analytics;
mod approvals;
mod audit;
mod dashboard;
mod error;
mod forgot_password;
mod invoices;
mod login;
mod notifications;
mod profile;
mod reset_password;
mod sign_up;
mod users;

pub use analytics::AnalyticsPage;
pub use approvals::ApprovalsPage;
pub use audit::AuditPage;
pub use dashboard::DashboardPage;
pub use error::ErrorPage;
pub use forgot_password::ForgotPasswordPage;
pub use invoices::InvoicesPage;
pub use login::LoginPage;
pub use notifications::NotificationsPage;
pub use profile::ProfilePage;
pub use reset_password::ResetPasswordPage;
pub use sign_up::SignUpPage;
pub use users::UsersPage;
