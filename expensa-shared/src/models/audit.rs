use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: i64,
    pub action: String,
    pub actor: String,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<i64>,
    #[serde(default)]
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// `Expense #12`-style reference to the affected entity.
    #[must_use]
    pub fn entity_label(&self) -> Option<String> {
        match (&self.entity_type, self.entity_id) {
            (Some(kind), Some(id)) => Some(format!("{kind} #{id}")),
            (Some(kind), None) => Some(kind.clone()),
            (None, Some(id)) => Some(format!("#{id}")),
            (None, None) => None,
        }
    }
}

/// Filters accepted by `GET /api/audit-logs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub actor: Option<String>,
}

impl AuditFilter {
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        [("action", &self.action), ("actor", &self.actor)]
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(|value| (key, value.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_labels() {
        let mut entry: AuditEntry = serde_json::from_str(
            r#"{"id":1,"action":"EXPENSE_APPROVED","actor":"admin","entityType":"Expense","entityId":12,"timestamp":"2025-04-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(entry.entity_label().as_deref(), Some("Expense #12"));
        entry.entity_type = None;
        assert_eq!(entry.entity_label().as_deref(), Some("#12"));
        entry.entity_id = None;
        assert!(entry.entity_label().is_none());
    }

    #[test]
    fn filter_skips_blank_values() {
        let filter = AuditFilter {
            action: Some("LOGIN".into()),
            actor: Some(" ".into()),
        };
        assert_eq!(filter.to_query(), vec![("action", "LOGIN".to_string())]);
    }
}
