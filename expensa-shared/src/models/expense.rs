use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::user::UserSummary;

/// Lifecycle state of an expense as reported by the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl ExpenseStatus {
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Pending,
        Self::Approved,
        Self::Rejected,
        Self::Paid,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Paid => "PAID",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Paid => "Paid",
        }
    }

    /// Only drafts may still be edited, deleted or submitted by their owner.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseStatus {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or("unknown expense status")
    }
}

/// An expense as listed on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub expense_date: NaiveDate,
    pub status: ExpenseStatus,
    #[serde(default)]
    pub submitted_by: Option<UserSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    /// Amount with its currency, e.g. `125.50 EUR`.
    #[must_use]
    pub fn formatted_amount(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency)
    }
}

/// Create/update payload for `POST /api/expenses` and `PUT /api/expenses/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub expense_date: NaiveDate,
}

impl ExpenseRequest {
    /// Checks the form before it is sent.
    ///
    /// # Errors
    /// Returns every problem found, one message per field.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            errors.push("Amount must be greater than zero".to_string());
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            errors.push("Currency must be a three-letter ISO code".to_string());
        }
        if self.category.trim().is_empty() {
            errors.push("Category is required".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl From<&Expense> for ExpenseRequest {
    fn from(expense: &Expense) -> Self {
        Self {
            title: expense.title.clone(),
            description: expense.description.clone(),
            amount: expense.amount,
            currency: expense.currency.clone(),
            category: expense.category.clone(),
            expense_date: expense.expense_date,
        }
    }
}

/// Filters accepted by `GET /api/expenses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub status: Option<ExpenseStatus>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Query parameters for the set filters; blank text filters are skipped.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(category) = non_blank(self.category.as_deref()) {
            query.push(("category", category));
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            query.push(("search", search));
        }
        if let Some(from) = self.from {
            query.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to", to.to_string()));
        }
        query
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
