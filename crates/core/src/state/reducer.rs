//! Pure state transitions: `(state, action) -> state`.

use serde::Serialize;
use serde_json::Value;

use crate::dates::{normalize_date, DateMode};
use crate::errors::CoreError;
use crate::models::budget::{AmountRow, BudgetCategory, IncomeRow, MonthlyBudgetItem};
use crate::models::investment::{HoldingRow, Investments};
use crate::models::savings::{
    AdditionalDepositRow, MarketChangeRow, RegularDepositRow, SavingsBucket, SavingsSection,
    WithdrawalRow,
};
use crate::models::state::AppState;
use crate::services::market_change::{anchored_amount, anchored_value, normalize_chain};
use crate::services::savings_service::SavingsService;

use super::action::{Action, RowPatch, RowTarget};

/// Compute the state after `action`. `state` itself is never modified.
pub fn reduce(state: &AppState, action: &Action) -> Result<AppState, CoreError> {
    let mut next = state.clone();
    apply(&mut next, action)?;
    Ok(next)
}

/// Apply `action` in place. On error the state may be partially modified,
/// which is why [`reduce`] works on a copy.
fn apply(state: &mut AppState, action: &Action) -> Result<(), CoreError> {
    match action {
        Action::AddRow { target, row_id } => add_row(state, target, row_id),
        Action::UpdateRow { target, row_id, patch } => update_row(state, target, row_id, patch),
        Action::RemoveRow { target, row_id } => remove_row(state, target, row_id),
        Action::AddSection { section_id, title, tab } => {
            if state.savings.section(section_id).is_some() {
                return Err(CoreError::ValidationError(format!(
                    "section id '{section_id}' already exists"
                )));
            }
            state.savings.sections.push(SavingsSection {
                id: section_id.clone(),
                title: title.clone(),
                tab: *tab,
                bucket: SavingsBucket::default(),
            });
            Ok(())
        }
        Action::RemoveSection { section_id } => {
            let idx = state
                .savings
                .sections
                .iter()
                .position(|s| &s.id == section_id)
                .ok_or_else(|| CoreError::SectionNotFound(section_id.clone()))?;
            state.savings.sections.remove(idx);
            Ok(())
        }
        Action::RenameSection { section_id, title } => {
            section_mut(state, section_id)?.title = title.clone();
            Ok(())
        }
        Action::SetSectionTab { section_id, tab } => {
            section_mut(state, section_id)?.tab = *tab;
            Ok(())
        }
        Action::SetBucketLocation { section_id, location } => {
            section_mut(state, section_id)?.bucket.location = location.clone();
            Ok(())
        }
        Action::SetCashStash { section_id, amount } => {
            let amount = finite("cashStash", *amount)?;
            section_mut(state, section_id)?.bucket.cash_stash = amount;
            Ok(())
        }
        Action::SetInvestmentStartDate(date) => {
            state.investments.start_date = normalize_date(date, DateMode::Full);
            Ok(())
        }
        Action::ReplaceState(replacement) => {
            *state = (**replacement).clone();
            Ok(())
        }
    }
}

// ── Rows ────────────────────────────────────────────────────────────

/// Common behaviour of every row type.
trait Row: Serialize {
    fn id(&self) -> &str;
    fn blank(id: String) -> Self;
    /// Apply a plain field patch. Returns `false` when the field does not
    /// exist on this row type.
    fn patch(&mut self, patch: &RowPatch) -> bool;
}

impl Row for AmountRow {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        AmountRow { id, label: String::new(), date: String::new(), amount: 0.0 }
    }
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Label(v) => self.label = v.clone(),
            RowPatch::Date(v) => self.date = v.clone(),
            RowPatch::Amount(v) => self.amount = *v,
            _ => return false,
        }
        true
    }
}

impl Row for IncomeRow {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        IncomeRow { id, label: String::new(), monthly_amount: 0.0 }
    }
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Label(v) => self.label = v.clone(),
            RowPatch::MonthlyAmount(v) => self.monthly_amount = *v,
            _ => return false,
        }
        true
    }
}

impl Row for MonthlyBudgetItem {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        MonthlyBudgetItem {
            id,
            label: String::new(),
            category: BudgetCategory::Saving,
            monthly_amount: 0.0,
        }
    }
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Label(v) => self.label = v.clone(),
            RowPatch::Category(v) => self.category = *v,
            RowPatch::MonthlyAmount(v) => self.monthly_amount = *v,
            _ => return false,
        }
        true
    }
}

impl Row for RegularDepositRow {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        RegularDepositRow { id, date: String::new(), amount: 0.0, target: 0.0 }
    }
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Date(v) => self.date = v.clone(),
            RowPatch::Amount(v) => self.amount = *v,
            RowPatch::Target(v) => self.target = *v,
            _ => return false,
        }
        true
    }
}

impl Row for AdditionalDepositRow {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        AdditionalDepositRow { id, date: String::new(), amount: 0.0, note: String::new() }
    }
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Date(v) => self.date = v.clone(),
            RowPatch::Amount(v) => self.amount = *v,
            RowPatch::Note(v) => self.note = v.clone(),
            _ => return false,
        }
        true
    }
}

impl Row for WithdrawalRow {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        WithdrawalRow { id, date: String::new(), amount: 0.0, reason: String::new() }
    }
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Date(v) => self.date = v.clone(),
            RowPatch::Amount(v) => self.amount = *v,
            RowPatch::Reason(v) => self.reason = v.clone(),
            _ => return false,
        }
        true
    }
}

impl Row for HoldingRow {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        HoldingRow { id, name: String::new(), location: String::new(), amount: 0.0 }
    }
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Name(v) => self.name = v.clone(),
            RowPatch::Location(v) => self.location = v.clone(),
            RowPatch::Amount(v) => self.amount = *v,
            _ => return false,
        }
        true
    }
}

impl Row for MarketChangeRow {
    fn id(&self) -> &str {
        &self.id
    }
    fn blank(id: String) -> Self {
        MarketChangeRow {
            id,
            date: String::new(),
            amount: 0.0,
            current_value: None,
            note: String::new(),
            holding_id: None,
        }
    }
    /// Plain fields only; amount/value/link edits are reconciled by the reducer.
    fn patch(&mut self, patch: &RowPatch) -> bool {
        match patch {
            RowPatch::Date(v) => self.date = v.clone(),
            RowPatch::Note(v) => self.note = v.clone(),
            _ => return false,
        }
        true
    }
}

fn add_row(state: &mut AppState, target: &RowTarget, row_id: &str) -> Result<(), CoreError> {
    fn push<R: Row>(rows: &mut Vec<R>, target: &RowTarget, row_id: &str) -> Result<(), CoreError> {
        if row_id.trim().is_empty() || rows.iter().any(|r| r.id() == row_id) {
            return Err(CoreError::ValidationError(format!(
                "row id '{row_id}' is blank or already used in {}",
                target.collection_name()
            )));
        }
        rows.push(R::blank(row_id.to_string()));
        Ok(())
    }

    match target {
        RowTarget::MonthlyExpense => push(&mut state.budget.monthly_expenses, target, row_id),
        RowTarget::YearlyExpense => push(&mut state.budget.yearly_expenses, target, row_id),
        RowTarget::MonthlyBudgetItem => push(&mut state.budget.monthly_budget_items, target, row_id),
        RowTarget::IncomeStream => push(&mut state.budget.income_streams, target, row_id),
        RowTarget::RegularDeposit { section_id } => {
            push(&mut bucket_mut(state, section_id)?.regular_deposits, target, row_id)
        }
        RowTarget::AdditionalDeposit { section_id } => {
            push(&mut bucket_mut(state, section_id)?.additional_deposits, target, row_id)
        }
        RowTarget::Withdrawal { section_id } => {
            push(&mut bucket_mut(state, section_id)?.withdrawals, target, row_id)
        }
        RowTarget::BucketMarketChange { section_id } => {
            push(&mut bucket_mut(state, section_id)?.market_changes, target, row_id)
        }
        RowTarget::Holding => push(&mut state.investments.holdings, target, row_id),
        RowTarget::InvestmentMarketChange => {
            push(&mut state.investments.market_changes, target, row_id)
        }
    }
}

fn update_row(
    state: &mut AppState,
    target: &RowTarget,
    row_id: &str,
    patch: &RowPatch,
) -> Result<(), CoreError> {
    let patch = &validate_patch(target, patch)?;

    match target {
        RowTarget::MonthlyExpense => patch_row(&mut state.budget.monthly_expenses, target, row_id, patch),
        RowTarget::YearlyExpense => patch_row(&mut state.budget.yearly_expenses, target, row_id, patch),
        RowTarget::MonthlyBudgetItem => {
            patch_row(&mut state.budget.monthly_budget_items, target, row_id, patch)
        }
        RowTarget::IncomeStream => patch_row(&mut state.budget.income_streams, target, row_id, patch),
        RowTarget::RegularDeposit { section_id } => {
            patch_row(&mut bucket_mut(state, section_id)?.regular_deposits, target, row_id, patch)
        }
        RowTarget::AdditionalDeposit { section_id } => {
            patch_row(&mut bucket_mut(state, section_id)?.additional_deposits, target, row_id, patch)
        }
        RowTarget::Withdrawal { section_id } => {
            patch_row(&mut bucket_mut(state, section_id)?.withdrawals, target, row_id, patch)
        }
        RowTarget::BucketMarketChange { section_id } => {
            patch_bucket_change(bucket_mut(state, section_id)?, target, row_id, patch)
        }
        RowTarget::Holding => patch_holding(&mut state.investments, target, row_id, patch),
        RowTarget::InvestmentMarketChange => {
            patch_investment_change(&mut state.investments, target, row_id, patch)
        }
    }
}

fn remove_row(state: &mut AppState, target: &RowTarget, row_id: &str) -> Result<(), CoreError> {
    fn remove<R: Row>(rows: &mut Vec<R>, target: &RowTarget, row_id: &str) -> Result<(), CoreError> {
        let idx = position(rows, target, row_id)?;
        rows.remove(idx);
        Ok(())
    }

    match target {
        RowTarget::MonthlyExpense => remove(&mut state.budget.monthly_expenses, target, row_id),
        RowTarget::YearlyExpense => remove(&mut state.budget.yearly_expenses, target, row_id),
        RowTarget::MonthlyBudgetItem => remove(&mut state.budget.monthly_budget_items, target, row_id),
        RowTarget::IncomeStream => remove(&mut state.budget.income_streams, target, row_id),
        RowTarget::RegularDeposit { section_id } => {
            remove(&mut bucket_mut(state, section_id)?.regular_deposits, target, row_id)
        }
        RowTarget::AdditionalDeposit { section_id } => {
            remove(&mut bucket_mut(state, section_id)?.additional_deposits, target, row_id)
        }
        RowTarget::Withdrawal { section_id } => {
            remove(&mut bucket_mut(state, section_id)?.withdrawals, target, row_id)
        }
        RowTarget::BucketMarketChange { section_id } => {
            remove(&mut bucket_mut(state, section_id)?.market_changes, target, row_id)
        }
        RowTarget::Holding => remove_holding(&mut state.investments, target, row_id),
        RowTarget::InvestmentMarketChange => {
            remove(&mut state.investments.market_changes, target, row_id)
        }
    }
}

fn patch_row<R: Row>(
    rows: &mut [R],
    target: &RowTarget,
    row_id: &str,
    patch: &RowPatch,
) -> Result<(), CoreError> {
    let idx = position(rows, target, row_id)?;
    if rows[idx].patch(patch) {
        Ok(())
    } else {
        Err(invalid_patch(target, patch))
    }
}

/// Bucket market changes: an amount edit is relative (clears the snapshot),
/// a value edit is absolute and the stored amount follows the chain.
fn patch_bucket_change(
    bucket: &mut SavingsBucket,
    target: &RowTarget,
    row_id: &str,
    patch: &RowPatch,
) -> Result<(), CoreError> {
    let idx = position(&bucket.market_changes, target, row_id)?;
    match patch {
        RowPatch::Amount(amount) => {
            let row = &mut bucket.market_changes[idx];
            row.amount = *amount;
            row.current_value = None;
        }
        RowPatch::CurrentValue(Some(value)) => {
            let base_value = SavingsService::new().summarize(bucket).base_value;
            let previous = normalize_chain(base_value, &bucket.market_changes[..idx])
                .last()
                .and_then(|row| row.current_value)
                .unwrap_or(base_value);
            let row = &mut bucket.market_changes[idx];
            row.current_value = Some(*value);
            row.amount = value - previous;
        }
        RowPatch::CurrentValue(None) => bucket.market_changes[idx].current_value = None,
        _ => {
            if !bucket.market_changes[idx].patch(patch) {
                return Err(invalid_patch(target, patch));
            }
        }
    }
    Ok(())
}

/// Investment market changes keep `amount` anchored to the linked holding.
fn patch_investment_change(
    investments: &mut Investments,
    target: &RowTarget,
    row_id: &str,
    patch: &RowPatch,
) -> Result<(), CoreError> {
    let idx = position(&investments.market_changes, target, row_id)?;
    let invested = investments
        .linked_holding(&investments.market_changes[idx])
        .map(|h| h.amount);

    match patch {
        RowPatch::HoldingId(new_link) => {
            let new_invested = match new_link {
                Some(id) => Some(
                    investments
                        .holding(id)
                        .ok_or_else(|| CoreError::HoldingNotFound(id.clone()))?
                        .amount,
                ),
                None => None,
            };
            let row = &mut investments.market_changes[idx];
            let current_value = anchored_value(row, invested);
            row.holding_id = new_link.clone();
            row.current_value = Some(current_value);
            row.amount = anchored_amount(current_value, new_invested);
        }
        RowPatch::CurrentValue(Some(value)) => {
            let row = &mut investments.market_changes[idx];
            row.current_value = Some(*value);
            row.amount = anchored_amount(*value, invested);
        }
        RowPatch::CurrentValue(None) => investments.market_changes[idx].current_value = None,
        RowPatch::Amount(amount) => {
            let row = &mut investments.market_changes[idx];
            row.amount = *amount;
            row.current_value = None;
        }
        _ => {
            if !investments.market_changes[idx].patch(patch) {
                return Err(invalid_patch(target, patch));
            }
        }
    }
    Ok(())
}

/// Holding edits; a new invested amount re-anchors linked snapshots.
fn patch_holding(
    investments: &mut Investments,
    target: &RowTarget,
    row_id: &str,
    patch: &RowPatch,
) -> Result<(), CoreError> {
    patch_row(&mut investments.holdings, target, row_id, patch)?;
    if let RowPatch::Amount(invested) = patch {
        for row in investments
            .market_changes
            .iter_mut()
            .filter(|row| row.holding_id.as_deref() == Some(row_id))
        {
            if let Some(value) = row.explicit_current_value() {
                row.amount = anchored_amount(value, Some(*invested));
            }
        }
    }
    Ok(())
}

/// Remove a holding and unassign its rows, keeping their absolute values.
fn remove_holding(
    investments: &mut Investments,
    target: &RowTarget,
    row_id: &str,
) -> Result<(), CoreError> {
    let idx = position(&investments.holdings, target, row_id)?;
    let removed = investments.holdings.remove(idx);
    for row in investments
        .market_changes
        .iter_mut()
        .filter(|row| row.holding_id.as_deref() == Some(removed.id.as_str()))
    {
        let current_value = anchored_value(row, Some(removed.amount));
        row.holding_id = None;
        row.current_value = Some(current_value);
        row.amount = anchored_amount(current_value, None);
    }
    Ok(())
}

// ── Lookups ─────────────────────────────────────────────────────────

/// Serialized snapshot of a row, or `None` if it does not exist.
pub fn find_row(state: &AppState, target: &RowTarget, row_id: &str) -> Option<Value> {
    fn find<R: Row>(rows: &[R], row_id: &str) -> Option<Value> {
        rows.iter()
            .find(|r| r.id() == row_id)
            .and_then(|r| serde_json::to_value(r).ok())
    }

    let bucket = |section_id: &str| state.savings.section(section_id).map(|s| &s.bucket);
    match target {
        RowTarget::MonthlyExpense => find(&state.budget.monthly_expenses, row_id),
        RowTarget::YearlyExpense => find(&state.budget.yearly_expenses, row_id),
        RowTarget::MonthlyBudgetItem => find(&state.budget.monthly_budget_items, row_id),
        RowTarget::IncomeStream => find(&state.budget.income_streams, row_id),
        RowTarget::RegularDeposit { section_id } => find(&bucket(section_id)?.regular_deposits, row_id),
        RowTarget::AdditionalDeposit { section_id } => {
            find(&bucket(section_id)?.additional_deposits, row_id)
        }
        RowTarget::Withdrawal { section_id } => find(&bucket(section_id)?.withdrawals, row_id),
        RowTarget::BucketMarketChange { section_id } => {
            find(&bucket(section_id)?.market_changes, row_id)
        }
        RowTarget::Holding => find(&state.investments.holdings, row_id),
        RowTarget::InvestmentMarketChange => find(&state.investments.market_changes, row_id),
    }
}

fn position<R: Row>(rows: &[R], target: &RowTarget, row_id: &str) -> Result<usize, CoreError> {
    rows.iter()
        .position(|r| r.id() == row_id)
        .ok_or_else(|| CoreError::RowNotFound {
            collection: target.collection_name().to_string(),
            id: row_id.to_string(),
        })
}

fn section_mut<'a>(state: &'a mut AppState, section_id: &str) -> Result<&'a mut SavingsSection, CoreError> {
    state
        .savings
        .section_mut(section_id)
        .ok_or_else(|| CoreError::SectionNotFound(section_id.to_string()))
}

fn bucket_mut<'a>(state: &'a mut AppState, section_id: &str) -> Result<&'a mut SavingsBucket, CoreError> {
    Ok(&mut section_mut(state, section_id)?.bucket)
}

// ── Validation ──────────────────────────────────────────────────────

/// Reject non-finite numbers and normalize dates for the target collection.
fn validate_patch(target: &RowTarget, patch: &RowPatch) -> Result<RowPatch, CoreError> {
    let field = patch.field_name();
    Ok(match patch {
        RowPatch::Amount(v) => RowPatch::Amount(finite(field, *v)?),
        RowPatch::Target(v) => RowPatch::Target(finite(field, *v)?),
        RowPatch::MonthlyAmount(v) => RowPatch::MonthlyAmount(finite(field, *v)?),
        RowPatch::CurrentValue(Some(v)) => RowPatch::CurrentValue(Some(finite(field, *v)?)),
        RowPatch::Date(raw) => match target.date_mode() {
            Some(mode) => RowPatch::Date(normalize_date(raw, mode)),
            None => return Err(invalid_patch(target, patch)),
        },
        RowPatch::HoldingId(Some(id)) if id.trim().is_empty() => RowPatch::HoldingId(None),
        other => other.clone(),
    })
}

fn finite(field: &str, value: f64) -> Result<f64, CoreError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoreError::ValidationError(format!(
            "{field} must be a finite number, got {value}"
        )))
    }
}

fn invalid_patch(target: &RowTarget, patch: &RowPatch) -> CoreError {
    CoreError::InvalidPatch {
        field: patch.field_name().to_string(),
        collection: target.collection_name().to_string(),
    }
}
