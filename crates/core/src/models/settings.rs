use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Default number of undo (and redo) snapshots kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 150;

/// Default number of audit entries kept in storage.
pub const DEFAULT_AUDIT_CAPACITY: usize = 400;

/// Default length of the net-worth projection, in months.
pub const DEFAULT_PROJECTION_MONTHS: u32 = 12;

/// Tracker configuration. Every field has a default, so a partial JSON
/// document only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Maximum snapshots on each of the undo and redo stacks
    pub history_capacity: usize,

    /// Maximum audit entries persisted (oldest dropped first)
    pub audit_capacity: usize,

    /// Number of months projected forward on the dashboard
    pub projection_months: u32,

    /// Storage key holding the serialized app state
    pub state_key: String,

    /// Storage key holding the serialized audit log
    pub audit_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
            projection_months: DEFAULT_PROJECTION_MONTHS,
            state_key: "finance-tracker.state".to_string(),
            audit_key: "finance-tracker.audit".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings overrides from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        if settings.state_key.trim().is_empty() || settings.audit_key.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "storage keys must not be empty".into(),
            ));
        }
        if settings.state_key == settings.audit_key {
            return Err(CoreError::ValidationError(format!(
                "state and audit storage keys must differ (both are '{}')",
                settings.state_key
            )));
        }
        Ok(settings)
    }
}
