use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{expense::Expense, user::UserProfile, user::UserSummary};

/// Which step of the chain an approval request waits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalLevel {
    Manager,
    Admin,
}

impl ApprovalLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// An entry of the approval queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub id: i64,
    pub expense: Expense,
    pub requester: UserSummary,
    pub level: ApprovalLevel,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ApprovalRequest {
    /// Whether `user` may approve or reject this request.
    ///
    /// Requesters never decide their own requests. Managers decide the
    /// manager step, admins decide either step. Without a known user id the
    /// answer is `false`.
    #[must_use]
    pub fn can_decide(&self, user: &UserProfile) -> bool {
        if self.status != ApprovalStatus::Pending {
            return false;
        }
        let Some(user_id) = user.id else {
            return false;
        };
        if user_id == self.requester.id {
            return false;
        }
        let flags = user.role_flags();
        match self.level {
            ApprovalLevel::Manager => flags.is_manager || flags.is_admin,
            ApprovalLevel::Admin => flags.is_admin,
        }
    }
}

/// Body for `POST /api/approvals/{id}/approve` and `/reject`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalDecision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ApprovalDecision {
    #[must_use]
    pub fn with_comment(comment: impl Into<String>) -> Self {
        let comment = comment.into();
        Self {
            comment: (!comment.trim().is_empty()).then_some(comment),
        }
    }
}
