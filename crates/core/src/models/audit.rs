use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Kind of edit recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Add,
    Update,
    Delete,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Add => write!(f, "add"),
            AuditAction::Update => write!(f, "update"),
            AuditAction::Delete => write!(f, "delete"),
        }
    }
}

/// A single recorded edit with its before/after values.
///
/// Write-only from the point of view of the calculators: nothing in the
/// summary engines reads these back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,

    pub timestamp: DateTime<Utc>,

    /// Page area the edit happened in (e.g. "Monthly expenses", a section title)
    pub section: String,

    /// Row or item the edit touched (its label, or id when unlabelled)
    pub item: String,

    /// Field name, empty for whole-row adds and deletes
    pub field: String,

    pub action: AuditAction,

    #[serde(default)]
    pub before: Value,

    #[serde(default)]
    pub after: Value,
}

impl AuditEntry {
    pub fn new(
        section: impl Into<String>,
        item: impl Into<String>,
        field: impl Into<String>,
        action: AuditAction,
        before: Value,
        after: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            section: section.into(),
            item: item.into(),
            field: field.into(),
            action,
            before,
            after,
        }
    }
}
