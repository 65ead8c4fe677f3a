//! Audit trail of user edits.
//!
//! The recorder is a write-only side channel: the summary engines never
//! read from it, and a missing or full log changes no calculation.

use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::models::audit::{AuditAction, AuditEntry};
use crate::models::settings::DEFAULT_AUDIT_CAPACITY;
use crate::models::state::AppState;

use super::action::Action;
use super::reducer::find_row;

/// Anything that can accept audit records.
pub trait AuditRecorder {
    fn record(
        &mut self,
        section: &str,
        item: &str,
        field: &str,
        action: AuditAction,
        before: Value,
        after: Value,
    );
}

/// In-memory audit log keeping the most recent `capacity` entries.
#[derive(Debug, Clone)]
pub struct AuditLog {
    entries: VecDeque<AuditEntry>,
    capacity: usize,
}

impl AuditLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Rebuild a log from stored entries, keeping only the newest `capacity`.
    pub fn from_entries(entries: Vec<AuditEntry>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            log.push(entry);
        }
        log
    }

    pub fn push(&mut self, entry: AuditEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &AuditEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<AuditEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIT_CAPACITY)
    }
}

impl AuditRecorder for AuditLog {
    fn record(
        &mut self,
        section: &str,
        item: &str,
        field: &str,
        action: AuditAction,
        before: Value,
        after: Value,
    ) {
        self.push(AuditEntry::new(section, item, field, action, before, after));
    }
}

/// Describe a committed action to `recorder`, comparing the state before
/// (`prev`) and after (`next`) it.
pub fn record_action(recorder: &mut impl AuditRecorder, prev: &AppState, next: &AppState, action: &Action) {
    match action {
        Action::AddRow { target, row_id } => {
            let after = find_row(next, target, row_id).unwrap_or(Value::Null);
            let section = row_section(next, target.section_id(), target.collection_name());
            recorder.record(&section, row_id, "", AuditAction::Add, Value::Null, after);
        }
        Action::UpdateRow { target, row_id, patch } => {
            let before_row = find_row(prev, target, row_id).unwrap_or(Value::Null);
            let after_row = find_row(next, target, row_id).unwrap_or(Value::Null);
            let field = patch.field_name();
            let section = row_section(next, target.section_id(), target.collection_name());
            recorder.record(
                &section,
                &row_item(&after_row, row_id),
                field,
                AuditAction::Update,
                before_row.get(field).cloned().unwrap_or(Value::Null),
                after_row.get(field).cloned().unwrap_or(Value::Null),
            );
        }
        Action::RemoveRow { target, row_id } => {
            let before = find_row(prev, target, row_id).unwrap_or(Value::Null);
            let section = row_section(prev, target.section_id(), target.collection_name());
            let item = row_item(&before, row_id);
            recorder.record(&section, &item, "", AuditAction::Delete, before, Value::Null);
        }
        Action::AddSection { title, tab, .. } => {
            recorder.record("Savings", title, "", AuditAction::Add, Value::Null, json!({ "title": title, "tab": tab }));
        }
        Action::RemoveSection { section_id } => {
            let before = prev
                .savings
                .section(section_id)
                .and_then(|s| serde_json::to_value(s).ok())
                .unwrap_or(Value::Null);
            let item = section_title(prev, section_id);
            recorder.record("Savings", &item, "", AuditAction::Delete, before, Value::Null);
        }
        Action::RenameSection { section_id, title } => {
            let before = section_title(prev, section_id);
            recorder.record("Savings", title, "title", AuditAction::Update, json!(before), json!(title));
        }
        Action::SetSectionTab { section_id, tab } => {
            let before = prev.savings.section(section_id).map(|s| s.tab);
            let item = section_title(next, section_id);
            recorder.record("Savings", &item, "tab", AuditAction::Update, json!(before), json!(tab));
        }
        Action::SetBucketLocation { section_id, location } => {
            let before = prev.savings.section(section_id).map(|s| s.bucket.location.clone());
            let item = section_title(next, section_id);
            recorder.record(&item, &item, "location", AuditAction::Update, json!(before), json!(location));
        }
        Action::SetCashStash { section_id, amount } => {
            let before = prev.savings.section(section_id).map(|s| s.bucket.cash_stash);
            let item = section_title(next, section_id);
            recorder.record(&item, &item, "cashStash", AuditAction::Update, json!(before), json!(amount));
        }
        Action::SetInvestmentStartDate(_) => {
            recorder.record(
                "Investments",
                "Investments",
                "startDate",
                AuditAction::Update,
                json!(prev.investments.start_date),
                json!(next.investments.start_date),
            );
        }
        Action::ReplaceState(_) => {
            recorder.record("All data", "state", "", AuditAction::Update, Value::Null, Value::Null);
        }
    }
}

/// "Primary savings / Withdrawals" for bucket rows, the collection name otherwise.
fn row_section(state: &AppState, section_id: Option<&str>, collection: &str) -> String {
    match section_id {
        Some(id) => format!("{} / {collection}", section_title(state, id)),
        None => collection.to_string(),
    }
}

fn section_title(state: &AppState, section_id: &str) -> String {
    state
        .savings
        .section(section_id)
        .map(|s| s.title.clone())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| section_id.to_string())
}

/// A row's label, name or note, falling back to its id.
fn row_item(row: &Value, row_id: &str) -> String {
    ["label", "name", "note"]
        .iter()
        .filter_map(|key| row.get(*key).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .unwrap_or(row_id)
        .to_string()
}
