use serde::{Deserialize, Serialize};

/// A planned monthly contribution and what was actually paid in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularDepositRow {
    pub id: String,
    pub date: String,
    /// Actual amount deposited
    pub amount: f64,
    /// Planned contribution
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalDepositRow {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRow {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub reason: String,
}

/// A growth/decline record.
///
/// A row is either a relative edit (only `amount`) or an absolute snapshot
/// (`current_value` set). The summary engines reconcile the two so that
/// `amount == current_value - previous value` on every output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketChangeRow {
    pub id: String,
    pub date: String,
    /// Signed delta against the previous value in the chain
    pub amount: f64,
    /// Absolute value snapshot after this change, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    pub note: String,
    /// Holding this row belongs to; `None` means unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding_id: Option<String>,
}

impl MarketChangeRow {
    /// The explicit snapshot value, ignoring non-finite garbage.
    pub fn explicit_current_value(&self) -> Option<f64> {
        self.current_value.filter(|v| v.is_finite())
    }
}

/// One savings account or goal and its ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsBucket {
    /// Where the money is held (bank, platform)
    pub location: String,
    /// Cash kept aside and not exposed to market movement
    pub cash_stash: f64,
    pub regular_deposits: Vec<RegularDepositRow>,
    pub additional_deposits: Vec<AdditionalDepositRow>,
    pub withdrawals: Vec<WithdrawalRow>,
    /// Append-ordered; this order drives the delta chain, not the dates
    pub market_changes: Vec<MarketChangeRow>,
}

/// Which page a section is listed on. Both use the same calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTab {
    #[default]
    Savings,
    Investments,
}

impl SectionTab {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "savings" => Some(Self::Savings),
            "investments" => Some(Self::Investments),
            _ => None,
        }
    }
}

impl std::fmt::Display for SectionTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionTab::Savings => write!(f, "savings"),
            SectionTab::Investments => write!(f, "investments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSection {
    pub id: String,
    pub title: String,
    pub tab: SectionTab,
    pub bucket: SavingsBucket,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub sections: Vec<SavingsSection>,
}

impl Savings {
    pub fn section(&self, section_id: &str) -> Option<&SavingsSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut SavingsSection> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }
}
