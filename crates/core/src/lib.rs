pub mod dates;
pub mod errors;
pub mod migration;
pub mod models;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;

use models::{
    analytics::{DashboardSummary, HoldingSummary, SavingsSummary},
    audit::AuditEntry,
    settings::Settings,
    state::AppState,
};
use services::{
    dashboard_service::DashboardService, holding_service::HoldingService,
    savings_service::SavingsService,
};
use state::{action::Action, audit::AuditLog, history::History, reducer};
use storage::{manager::StorageManager, store::KeyValueStore};
use tracing::{info, warn};

use errors::CoreError;

/// Main entry point for the finance-tracker core library.
/// Holds the current state, its undo/redo history, the audit log, and the
/// store everything is persisted to.
#[must_use]
pub struct FinanceTracker<S: KeyValueStore> {
    state: AppState,
    history: History<AppState>,
    audit: AuditLog,
    store: S,
    settings: Settings,
    savings_service: SavingsService,
    holding_service: HoldingService,
    dashboard_service: DashboardService,
}

impl<S: KeyValueStore> std::fmt::Debug for FinanceTracker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceTracker")
            .field("sections", &self.state.savings.sections.len())
            .field("holdings", &self.state.investments.holdings.len())
            .field("undo", &self.history.undo_len())
            .field("redo", &self.history.redo_len())
            .field("audit_entries", &self.audit.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl<S: KeyValueStore> FinanceTracker<S> {
    /// Load the tracker from `store` with default settings.
    pub fn open(store: S) -> Self {
        Self::open_with_settings(store, Settings::default())
    }

    /// Load the tracker from `store`.
    /// Missing or corrupt saved state falls back to the built-in defaults.
    pub fn open_with_settings(store: S, settings: Settings) -> Self {
        let state = StorageManager::load_state(&store, &settings.state_key);
        let entries = StorageManager::load_audit(&store, &settings.audit_key, settings.audit_capacity);

        Self {
            state,
            history: History::new(settings.history_capacity),
            audit: AuditLog::from_entries(entries, settings.audit_capacity),
            dashboard_service: DashboardService::with_projection_months(settings.projection_months),
            savings_service: SavingsService::new(),
            holding_service: HoldingService::new(),
            store,
            settings,
        }
    }

    // ── State ───────────────────────────────────────────────────────

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The underlying store (e.g. to inspect what was persisted).
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply an action.
    ///
    /// Returns `Ok(false)` when the action changes nothing; no history or
    /// audit entry is recorded in that case. Otherwise the previous state
    /// goes onto the undo stack, the redo stack is cleared, the edit is
    /// audited, and the new state is persisted.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, CoreError> {
        let next = reducer::reduce(&self.state, &action)?;
        if next == self.state {
            return Ok(false);
        }

        state::audit::record_action(&mut self.audit, &self.state, &next, &action);
        let previous = std::mem::replace(&mut self.state, next);
        self.history.record(previous);
        self.persist();
        Ok(true)
    }

    /// Restore the state before the last committed change.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.state.clone()) {
            Some(previous) => {
                self.state = previous;
                self.persist_state();
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone change.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.state.clone()) {
            Some(next) => {
                self.state = next;
                self.persist_state();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Replace everything with the built-in defaults (undoable).
    pub fn reset_to_defaults(&mut self) -> Result<bool, CoreError> {
        info!("resetting state to the built-in defaults");
        self.dispatch(Action::ReplaceState(Box::new(seed::default_state())))
    }

    // ── Import / Export ─────────────────────────────────────────────

    /// Replace the state with a JSON document, migrating it first (undoable).
    /// Unlike loading from storage, text that is not JSON is an error here.
    pub fn import_json(&mut self, json: &str) -> Result<bool, CoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let state = migration::migrate(&value);
        info!(
            sections = state.savings.sections.len(),
            holdings = state.investments.holdings.len(),
            "importing state from JSON"
        );
        self.dispatch(Action::ReplaceState(Box::new(state)))
    }

    /// Export the current state as pretty JSON in its canonical shape.
    pub fn export_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize state: {e}")))
    }

    // ── Summaries ───────────────────────────────────────────────────

    /// Summary of one savings section's bucket.
    #[must_use]
    pub fn bucket_summary(&self, section_id: &str) -> Option<SavingsSummary> {
        self.state
            .savings
            .section(section_id)
            .map(|section| self.savings_service.summarize(&section.bucket))
    }

    #[must_use]
    pub fn holding_summaries(&self) -> Vec<HoldingSummary> {
        self.holding_service.summarize_holdings(
            &self.state.investments.holdings,
            &self.state.investments.market_changes,
        )
    }

    #[must_use]
    pub fn dashboard(&self) -> DashboardSummary {
        self.dashboard_service.summarize(&self.state)
    }

    // ── Audit ───────────────────────────────────────────────────────

    /// Recorded edits, oldest first.
    #[must_use]
    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.to_vec()
    }

    pub fn clear_audit(&mut self) {
        self.audit.clear();
        self.persist_audit();
    }

    // ── Internal ────────────────────────────────────────────────────

    fn persist(&mut self) {
        self.persist_state();
        self.persist_audit();
    }

    /// Fire-and-forget: a failed write is logged and the in-memory state
    /// stays committed.
    fn persist_state(&mut self) {
        if let Err(e) = StorageManager::save_state(&mut self.store, &self.settings.state_key, &self.state) {
            warn!(error = %e, "failed to persist state");
        }
    }

    fn persist_audit(&mut self) {
        let entries = self.audit.to_vec();
        if let Err(e) = StorageManager::save_audit(
            &mut self.store,
            &self.settings.audit_key,
            &entries,
            self.settings.audit_capacity,
        ) {
            warn!(error = %e, "failed to persist audit log");
        }
    }
}
