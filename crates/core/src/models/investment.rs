use serde::{Deserialize, Serialize};

use super::savings::MarketChangeRow;

/// One investment position.
///
/// `amount` is what was originally put in, NOT the current value. The
/// current value comes from the last market-change row linked to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRow {
    pub id: String,
    pub name: String,
    pub location: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investments {
    pub start_date: String,
    pub holdings: Vec<HoldingRow>,
    pub market_changes: Vec<MarketChangeRow>,
}

impl Investments {
    pub fn holding(&self, holding_id: &str) -> Option<&HoldingRow> {
        self.holdings.iter().find(|h| h.id == holding_id)
    }

    /// Resolve a row's link, treating dangling ids as unassigned.
    pub fn linked_holding(&self, row: &MarketChangeRow) -> Option<&HoldingRow> {
        row.holding_id.as_deref().and_then(|id| self.holding(id))
    }
}
