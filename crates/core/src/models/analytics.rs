use serde::{Deserialize, Serialize};

use super::savings::{MarketChangeRow, SectionTab};

/// Derived figures for one savings bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    /// Sum of actual regular deposits
    pub regular_total: f64,

    /// Sum of planned regular deposits
    pub regular_target_total: f64,

    pub additional_total: f64,

    pub withdrawal_total: f64,

    /// regular_total + additional_total
    pub total_before_withdrawals: f64,

    pub cash_stash: f64,

    /// Balance exposed to the market before any recorded growth/decline:
    /// total_before_withdrawals - withdrawal_total - cash_stash
    pub base_value: f64,

    /// Market-change rows with both `amount` and `current_value` filled in,
    /// chained in array order from `base_value`
    pub normalized_market_changes: Vec<MarketChangeRow>,

    /// Sum of the normalized amounts
    pub market_change_total: f64,

    /// market_change_total / base_value; `None` when the base is zero
    pub market_change_ratio: Option<f64>,

    /// base_value + market_change_total
    pub final_total: f64,
}

/// Summary of a single investment holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingSummary {
    pub holding_id: String,

    pub name: String,

    pub location: String,

    /// Amount originally invested
    pub invested: f64,

    /// Value taken from the last linked market-change row, or `invested`
    pub current_value: f64,

    /// current_value - invested
    pub market_change_total: f64,

    /// market_change_total / invested; `None` when nothing was invested
    pub market_change_ratio: Option<f64>,

    /// Id of the row the current value was taken from
    pub last_change_id: Option<String>,

    /// Number of market-change rows linked to this holding
    pub linked_changes: usize,
}

/// A bucket summary tagged with the section it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub section_id: String,
    pub title: String,
    pub tab: SectionTab,
    pub summary: SavingsSummary,
}

/// Projected net worth `month_index` months from now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month_index: u32,
    pub net_worth: f64,
}

/// Whole-portfolio figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    // ── Budget (monthly) ──────────────────────────────────────────
    pub monthly_expenses_total: f64,
    pub monthly_spending_budget: f64,
    pub monthly_saving_budget: f64,
    pub monthly_investing_budget: f64,
    pub total_monthly_income: f64,

    // ── Budget (yearly) ───────────────────────────────────────────
    pub yearly_expenses_total: f64,
    pub total_yearly_income: f64,
    pub total_yearly_spending: f64,
    pub total_yearly_saving_investing: f64,
    pub total_yearly_expenditure: f64,
    /// Should stay non-negative for a sustainable budget
    pub income_minus_expenditure: f64,
    /// Share of yearly expenditure that is spending
    pub spending_ratio: Option<f64>,
    /// Share of yearly expenditure that is saved or invested
    pub saving_investing_ratio: Option<f64>,

    // ── Net worth ─────────────────────────────────────────────────
    pub savings_tab_total: f64,
    pub investments_tab_total: f64,
    pub holdings_total: f64,
    pub cash_stash_total: f64,
    pub tracked_net_worth: f64,

    // ── Holdings growth ───────────────────────────────────────────
    pub holdings_invested_total: f64,
    pub holdings_market_change_total: f64,
    pub holdings_market_change_ratio: Option<f64>,

    // ── Trend ─────────────────────────────────────────────────────
    /// Monthly income minus monthly outgoings (spending only)
    pub monthly_delta: f64,
    pub projection: Vec<ProjectionPoint>,

    pub sections: Vec<SectionSummary>,
    pub holdings: Vec<HoldingSummary>,
}
