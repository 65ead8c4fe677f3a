use tracing::warn;

use crate::errors::CoreError;
use crate::migration;
use crate::models::audit::AuditEntry;
use crate::models::state::AppState;
use crate::seed;

use super::store::KeyValueStore;

/// High-level storage operations: save/load state and audit entries.
pub struct StorageManager;

impl StorageManager {
    /// Serialize the state in its canonical shape and store it under `key`.
    pub fn save_state(
        store: &mut impl KeyValueStore,
        key: &str,
        state: &AppState,
    ) -> Result<(), CoreError> {
        let json = serde_json::to_string(state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize state: {e}")))?;
        store.set(key, &json)
    }

    /// Load the state stored under `key`.
    ///
    /// Flow: stored text → JSON value → migration → AppState.
    /// Nothing stored, an unreadable store, or unparseable text all count
    /// as "no saved state" and give the seed state.
    pub fn load_state(store: &impl KeyValueStore, key: &str) -> AppState {
        match store.get(key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => migration::migrate(&value),
                Err(e) => {
                    warn!(key, error = %e, "stored state is corrupt, falling back to defaults");
                    seed::default_state()
                }
            },
            Ok(None) => seed::default_state(),
            Err(e) => {
                warn!(key, error = %e, "could not read stored state, falling back to defaults");
                seed::default_state()
            }
        }
    }

    /// Store the newest `capacity` audit entries under `key`.
    pub fn save_audit(
        store: &mut impl KeyValueStore,
        key: &str,
        entries: &[AuditEntry],
        capacity: usize,
    ) -> Result<(), CoreError> {
        let start = entries.len().saturating_sub(capacity);
        let json = serde_json::to_string(&entries[start..])
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize audit log: {e}")))?;
        store.set(key, &json)
    }

    /// Load at most the newest `capacity` audit entries. A missing or
    /// corrupt log gives an empty list.
    pub fn load_audit(store: &impl KeyValueStore, key: &str, capacity: usize) -> Vec<AuditEntry> {
        let json = match store.get(key) {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key, error = %e, "could not read stored audit log");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<AuditEntry>>(&json) {
            Ok(mut entries) => {
                let excess = entries.len().saturating_sub(capacity);
                entries.drain(..excess);
                entries
            }
            Err(e) => {
                warn!(key, error = %e, "stored audit log is corrupt, starting a new one");
                Vec::new()
            }
        }
    }
}
