use serde::{Deserialize, Serialize};

use super::budget::Budget;
use super::investment::Investments;
use super::savings::Savings;

/// The main data container. The whole thing is serialized and stored
/// after every committed edit, and migrated again when it is loaded.
///
/// Contains: the budget page (expenses, budget items, income), savings
/// sections (one bucket each), and the investment holdings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub budget: Budget,
    pub savings: Savings,
    pub investments: Investments,
}
