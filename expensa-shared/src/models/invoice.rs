use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Issued,
    Paid,
    Void,
}

impl InvoiceStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Issued => "Issued",
            Self::Paid => "Paid",
            Self::Void => "Void",
        }
    }
}

/// Invoice generated by the backend for an approved expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: i64,
    pub number: String,
    pub expense_id: i64,
    pub amount: f64,
    pub currency: String,
    pub issued_at: DateTime<Utc>,
    pub status: InvoiceStatus,
}

impl Invoice {
    /// File name used when saving the PDF.
    #[must_use]
    pub fn file_name(&self) -> String {
        let safe: String = self
            .number
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("invoice-{safe}.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_file_name_is_sanitized() {
        let invoice: Invoice = serde_json::from_str(
            r#"{"id":1,"number":"INV/2025 001","expenseId":9,"amount":12.5,"currency":"EUR","issuedAt":"2025-05-01T00:00:00Z","status":"ISSUED"}"#,
        )
        .unwrap();
        assert_eq!(invoice.file_name(), "invoice-INV_2025_001.pdf");
        assert_eq!(invoice.status.label(), "Issued");
    }
}
