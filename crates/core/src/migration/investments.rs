use tracing::debug;

use super::coerce::{field, rows, to_date_text, to_finite_number, to_text, Object};
use super::savings::market_change_row;
use crate::models::investment::{HoldingRow, Investments};

pub(super) fn migrate_investments(investments: &Object) -> Investments {
    let holdings = rows(investments.get("holdings"), "holding", |obj, id| HoldingRow {
        id,
        name: to_text(field(obj, &["name", "label"])),
        location: to_text(obj.get("location")),
        amount: to_finite_number(field(obj, &["amount", "invested"]), 0.0),
    });

    let mut market_changes = rows(investments.get("marketChanges"), "market-change", market_change_row);
    let mut inferred = 0usize;
    for row in &mut market_changes {
        let linked = row
            .holding_id
            .as_deref()
            .is_some_and(|id| holdings.iter().any(|h| h.id == id));
        if linked {
            continue;
        }
        row.holding_id = infer_holding_id(&row.note, &holdings);
        if row.holding_id.is_some() {
            inferred += 1;
        }
    }
    if inferred > 0 {
        debug!(inferred, "inferred holding links for market changes from their notes");
    }

    Investments {
        start_date: to_date_text(investments.get("startDate")),
        holdings,
        market_changes,
    }
}

/// First holding whose trimmed, lowercased name occurs in the note.
/// Holdings with blank names never match.
pub fn infer_holding_id(note: &str, holdings: &[HoldingRow]) -> Option<String> {
    let note = note.to_lowercase();
    holdings
        .iter()
        .find(|holding| {
            let name = holding.name.trim().to_lowercase();
            !name.is_empty() && note.contains(&name)
        })
        .map(|holding| holding.id.clone())
}
