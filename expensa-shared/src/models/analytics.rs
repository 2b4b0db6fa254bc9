use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::expense::ExpenseStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: ExpenseStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub total: f64,
}

/// Aggregates from `GET /api/analytics/summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsSummary {
    pub total_amount: f64,
    pub expense_count: u64,
    pub pending_count: u64,
    pub by_category: Vec<CategoryTotal>,
    pub by_status: Vec<StatusCount>,
    pub monthly: Vec<MonthlyTotal>,
}

impl AnalyticsSummary {
    /// Category with the largest total, if any.
    #[must_use]
    pub fn top_category(&self) -> Option<&CategoryTotal> {
        self.by_category
            .iter()
            .max_by(|a, b| a.total.total_cmp(&b.total))
    }

    /// Share of `total_amount` spent in `category`, in percent.
    #[must_use]
    pub fn category_share(&self, category: &CategoryTotal) -> f64 {
        if self.total_amount > 0.0 {
            category.total / self.total_amount * 100.0
        } else {
            0.0
        }
    }
}

/// Optional reporting window for analytics queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub fn to_query(self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(from) = self.from {
            query.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            query.push(("to", to.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_helpers() {
        let summary: AnalyticsSummary = serde_json::from_str(
            r#"{
                "totalAmount": 400.0,
                "expenseCount": 3,
                "byCategory": [
                    {"category": "Travel", "total": 300.0},
                    {"category": "Meals", "total": 100.0}
                ],
                "byStatus": [{"status": "PAID", "count": 3}]
            }"#,
        )
        .unwrap();

        let top = summary.top_category().unwrap();
        assert_eq!(top.category, "Travel");
        assert!((summary.category_share(top) - 75.0).abs() < f64::EPSILON);
        assert_eq!(summary.pending_count, 0);
        assert!(summary.monthly.is_empty());
    }

    #[test]
    fn empty_summary_has_no_top_category() {
        let summary = AnalyticsSummary::default();
        assert!(summary.top_category().is_none());
        let share = summary.category_share(&CategoryTotal {
            category: "Travel".into(),
            total: 10.0,
        });
        assert!(share.abs() < f64::EPSILON);
    }

    #[test]
    fn date_range_query() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 3, 31),
        };
        assert_eq!(
            range.to_query(),
            vec![("from", "2025-01-01".to_string()), ("to", "2025-03-31".to_string())]
        );
    }
}
