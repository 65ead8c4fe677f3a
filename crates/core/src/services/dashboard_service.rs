use crate::models::analytics::{DashboardSummary, ProjectionPoint, SectionSummary};
use crate::models::budget::BudgetCategory;
use crate::models::savings::SectionTab;
use crate::models::settings::DEFAULT_PROJECTION_MONTHS;
use crate::models::state::AppState;
use crate::services::holding_service::HoldingService;
use crate::services::market_change::{finite_or_zero, ratio};
use crate::services::savings_service::SavingsService;

/// Months per year. Yearly figures are always monthly × 12, with no
/// calendar-aware compounding.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Combines bucket and holding summaries into whole-portfolio figures.
pub struct DashboardService {
    savings_service: SavingsService,
    holding_service: HoldingService,
    projection_months: u32,
}

impl DashboardService {
    pub fn new() -> Self {
        Self::with_projection_months(DEFAULT_PROJECTION_MONTHS)
    }

    pub fn with_projection_months(projection_months: u32) -> Self {
        Self {
            savings_service: SavingsService::new(),
            holding_service: HoldingService::new(),
            projection_months,
        }
    }

    /// Summaries for every savings section, in section order.
    pub fn section_summaries(&self, state: &AppState) -> Vec<SectionSummary> {
        state
            .savings
            .sections
            .iter()
            .map(|section| SectionSummary {
                section_id: section.id.clone(),
                title: section.title.clone(),
                tab: section.tab,
                summary: self.savings_service.summarize(&section.bucket),
            })
            .collect()
    }

    /// Compute the full dashboard.
    ///
    /// Computes:
    /// - Monthly and yearly budget totals, split by category
    /// - Income minus expenditure and the spending/saving split
    /// - Tracked net worth across sections, holdings and cash stashes
    /// - A linear net-worth projection (no compounding, no seasonality)
    pub fn summarize(&self, state: &AppState) -> DashboardSummary {
        let budget = &state.budget;

        // 1. Budget
        let monthly_expenses_total = sum(budget.monthly_expenses.iter().map(|r| r.amount));
        let yearly_expenses_total = sum(budget.yearly_expenses.iter().map(|r| r.amount));
        let monthly_spending_budget = budget.category_total(BudgetCategory::Spending);
        let monthly_saving_budget = budget.category_total(BudgetCategory::Saving);
        let monthly_investing_budget = budget.category_total(BudgetCategory::Investing);
        let total_monthly_income = sum(budget.income_streams.iter().map(|r| r.monthly_amount));

        let total_yearly_income = total_monthly_income * MONTHS_PER_YEAR;
        let total_yearly_spending = monthly_expenses_total * MONTHS_PER_YEAR
            + yearly_expenses_total
            + monthly_spending_budget * MONTHS_PER_YEAR;
        let total_yearly_saving_investing =
            monthly_saving_budget * MONTHS_PER_YEAR + monthly_investing_budget * MONTHS_PER_YEAR;
        let total_yearly_expenditure = total_yearly_spending + total_yearly_saving_investing;
        let income_minus_expenditure = total_yearly_income - total_yearly_expenditure;

        // 2. Net worth
        let sections = self.section_summaries(state);
        let tab_total = |tab: SectionTab| -> f64 {
            sections
                .iter()
                .filter(|s| s.tab == tab)
                .map(|s| s.summary.final_total)
                .sum()
        };
        let savings_tab_total = tab_total(SectionTab::Savings);
        let investments_tab_total = tab_total(SectionTab::Investments);
        let cash_stash_total: f64 = sections.iter().map(|s| s.summary.cash_stash).sum();

        let holdings = self
            .holding_service
            .summarize_holdings(&state.investments.holdings, &state.investments.market_changes);
        let holdings_total: f64 = holdings.iter().map(|h| h.current_value).sum();
        let holdings_invested_total: f64 = holdings.iter().map(|h| h.invested).sum();
        let holdings_market_change_total = holdings_total - holdings_invested_total;

        let tracked_net_worth =
            savings_tab_total + investments_tab_total + holdings_total + cash_stash_total;

        // 3. Trend: only spending leaves the tracked net worth
        let monthly_delta = total_monthly_income
            - (monthly_expenses_total
                + yearly_expenses_total / MONTHS_PER_YEAR
                + monthly_spending_budget);
        let projection = project_net_worth(tracked_net_worth, monthly_delta, self.projection_months);

        DashboardSummary {
            monthly_expenses_total,
            monthly_spending_budget,
            monthly_saving_budget,
            monthly_investing_budget,
            total_monthly_income,
            yearly_expenses_total,
            total_yearly_income,
            total_yearly_spending,
            total_yearly_saving_investing,
            total_yearly_expenditure,
            income_minus_expenditure,
            spending_ratio: ratio(total_yearly_spending, total_yearly_expenditure),
            saving_investing_ratio: ratio(total_yearly_saving_investing, total_yearly_expenditure),
            savings_tab_total,
            investments_tab_total,
            holdings_total,
            cash_stash_total,
            tracked_net_worth,
            holdings_invested_total,
            holdings_market_change_total,
            holdings_market_change_ratio: ratio(holdings_market_change_total, holdings_invested_total),
            monthly_delta,
            projection,
            sections,
            holdings,
        }
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear projection: `start + monthly_delta × k` for k = 0..=months.
pub fn project_net_worth(start: f64, monthly_delta: f64, months: u32) -> Vec<ProjectionPoint> {
    (0..=months)
        .map(|month_index| ProjectionPoint {
            month_index,
            net_worth: start + monthly_delta * f64::from(month_index),
        })
        .collect()
}

fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.map(finite_or_zero).sum()
}
