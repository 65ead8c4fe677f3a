//! Schema migration: any persisted or seed blob → current [`AppState`].
//!
//! Migration is total. Each field is decoded on its own and falls back to a
//! structural default when it is missing or malformed, so the result is
//! never a partially-decoded state. Running it on its own output is a no-op.
//!
//! Order of work:
//! 1. investments (holdings must be known before links can be checked)
//! 2. budget, with legacy flat budget fields and the default template
//! 3. savings sections, with the legacy fixed-bucket layouts
//! 4. date normalization over every row

pub mod coerce;

mod budget;
mod investments;
mod savings;

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::dates::{normalize_date, DateMode};
use crate::models::savings::SavingsBucket;
use crate::models::state::AppState;
use crate::seed;

use coerce::{object, Object};

pub use investments::infer_holding_id;

/// Upgrade an arbitrarily-shaped value into the current state shape.
pub fn migrate(raw: &Value) -> AppState {
    let Some(root) = raw.as_object() else {
        debug!("persisted state is not an object, using the seed state");
        return seed::default_state();
    };

    let empty = Object::new();
    let investments = investments::migrate_investments(object(root, "investments").unwrap_or(&empty));
    let holding_ids: HashSet<String> = investments.holdings.iter().map(|h| h.id.clone()).collect();

    let mut state = AppState {
        budget: budget::migrate_budget(root, object(root, "budget").unwrap_or(&empty)),
        savings: savings::migrate_savings(root, object(root, "savings").unwrap_or(&empty), &holding_ids),
        investments,
    };
    normalize_dates(&mut state);
    state
}

/// Parse a JSON document and migrate it. Unparseable text is treated as
/// "no saved state" and gives the seed state.
pub fn migrate_str(json: &str) -> AppState {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => migrate(&value),
        Err(e) => {
            debug!(error = %e, "persisted state is not valid JSON, using the seed state");
            seed::default_state()
        }
    }
}

/// Normalize every date field in place using its display mode.
pub fn normalize_dates(state: &mut AppState) {
    for row in &mut state.budget.monthly_expenses {
        row.date = normalize_date(&row.date, DateMode::Day);
    }
    for row in &mut state.budget.yearly_expenses {
        row.date = normalize_date(&row.date, DateMode::DayMonth);
    }
    for section in &mut state.savings.sections {
        normalize_bucket_dates(&mut section.bucket);
    }
    state.investments.start_date = normalize_date(&state.investments.start_date, DateMode::Full);
    for row in &mut state.investments.market_changes {
        row.date = normalize_date(&row.date, DateMode::Full);
    }
}

fn normalize_bucket_dates(bucket: &mut SavingsBucket) {
    for row in &mut bucket.regular_deposits {
        row.date = normalize_date(&row.date, DateMode::Full);
    }
    for row in &mut bucket.additional_deposits {
        row.date = normalize_date(&row.date, DateMode::Full);
    }
    for row in &mut bucket.withdrawals {
        row.date = normalize_date(&row.date, DateMode::Full);
    }
    for row in &mut bucket.market_changes {
        row.date = normalize_date(&row.date, DateMode::Full);
    }
}
