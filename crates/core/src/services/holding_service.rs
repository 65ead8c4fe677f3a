use crate::models::analytics::HoldingSummary;
use crate::models::investment::HoldingRow;
use crate::models::savings::MarketChangeRow;
use crate::services::market_change::{anchored_value, finite_or_zero, ratio};

/// Resolves each holding's current value from its linked market changes.
pub struct HoldingService;

impl HoldingService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize every holding, in holding order.
    ///
    /// The last linked row by position is authoritative — not the largest
    /// value and not the latest date. Holdings with no linked rows are
    /// reported at their invested amount.
    pub fn summarize_holdings(
        &self,
        holdings: &[HoldingRow],
        market_changes: &[MarketChangeRow],
    ) -> Vec<HoldingSummary> {
        holdings
            .iter()
            .map(|holding| self.summarize_holding(holding, market_changes))
            .collect()
    }

    pub fn summarize_holding(
        &self,
        holding: &HoldingRow,
        market_changes: &[MarketChangeRow],
    ) -> HoldingSummary {
        let invested = finite_or_zero(holding.amount);
        let linked: Vec<&MarketChangeRow> = market_changes
            .iter()
            .filter(|row| row.holding_id.as_deref() == Some(holding.id.as_str()))
            .collect();

        let last = linked.last();
        let current_value = last
            .map(|row| anchored_value(row, Some(invested)))
            .unwrap_or(invested);
        let market_change_total = current_value - invested;

        HoldingSummary {
            holding_id: holding.id.clone(),
            name: holding.name.clone(),
            location: holding.location.clone(),
            invested,
            current_value,
            market_change_total,
            market_change_ratio: ratio(market_change_total, invested),
            last_change_id: last.map(|row| row.id.clone()),
            linked_changes: linked.len(),
        }
    }

    /// Market-change rows that are not linked to any existing holding.
    pub fn unassigned_changes<'a>(
        &self,
        holdings: &[HoldingRow],
        market_changes: &'a [MarketChangeRow],
    ) -> Vec<&'a MarketChangeRow> {
        market_changes
            .iter()
            .filter(|row| {
                row.holding_id
                    .as_deref()
                    .map_or(true, |id| !holdings.iter().any(|h| h.id == id))
            })
            .collect()
    }
}

impl Default for HoldingService {
    fn default() -> Self {
        Self::new()
    }
}
