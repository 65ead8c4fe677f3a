//! Reconciliation of a market-change row's two fields.
//!
//! A row carries a signed `amount` and an optional absolute `current_value`.
//! When the absolute value is present it wins, and the amount is derived
//! from it; otherwise the absolute value is derived from the amount. The
//! anchor the amount is measured from differs by context:
//!
//! - bucket chains: the previous row's value (the first row uses the
//!   bucket's base value), walked in array order
//! - holdings: the holding's invested amount, or zero for unassigned rows

use crate::models::savings::MarketChangeRow;

/// A row's amount and value after reconciliation. Always consistent:
/// `amount == current_value - anchor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciled {
    pub amount: f64,
    pub current_value: f64,
}

/// Reconcile one row against `anchor`.
pub fn reconcile(row: &MarketChangeRow, anchor: f64) -> Reconciled {
    let current_value = row
        .explicit_current_value()
        .unwrap_or_else(|| anchor + finite_or_zero(row.amount));
    Reconciled {
        amount: current_value - anchor,
        current_value,
    }
}

/// Walk a bucket's rows in array order starting from `base_value`.
///
/// Every output row has `current_value` set and an `amount` equal to the
/// difference from the previous row's value. Feeding the output back in
/// returns it unchanged.
pub fn normalize_chain(base_value: f64, rows: &[MarketChangeRow]) -> Vec<MarketChangeRow> {
    let mut previous = base_value;
    rows.iter()
        .map(|row| {
            let Reconciled { amount, current_value } = reconcile(row, previous);
            previous = current_value;
            MarketChangeRow {
                amount,
                current_value: Some(current_value),
                ..row.clone()
            }
        })
        .collect()
}

/// Absolute value of a holding row: explicit value, else
/// `invested + amount` when linked, else the amount itself.
pub fn anchored_value(row: &MarketChangeRow, invested: Option<f64>) -> f64 {
    reconcile(row, invested.map(finite_or_zero).unwrap_or(0.0)).current_value
}

/// Amount to store for an absolute value: the delta against the linked
/// holding's invested amount, or the value verbatim when unlinked.
pub fn anchored_amount(current_value: f64, invested: Option<f64>) -> f64 {
    match invested {
        Some(invested) => current_value - finite_or_zero(invested),
        None => current_value,
    }
}

/// `change / base`, or `None` when the base is zero or the result is not
/// a finite number.
pub fn ratio(change: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    let value = change / base;
    value.is_finite().then_some(value)
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
