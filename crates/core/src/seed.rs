//! Built-in default data used on first run and on "reload defaults".

use crate::models::budget::{AmountRow, Budget, BudgetCategory, IncomeRow, MonthlyBudgetItem};
use crate::models::investment::{HoldingRow, Investments};
use crate::models::savings::{
    AdditionalDepositRow, MarketChangeRow, RegularDepositRow, Savings, SavingsBucket,
    SavingsSection, SectionTab, WithdrawalRow,
};
use crate::models::state::AppState;

pub const PRIMARY_SECTION_ID: &str = "primary";
pub const SECONDARY_SECTION_ID: &str = "secondary";
pub const INVESTMENT_FUND_SECTION_ID: &str = "investment-fund";

pub const PRIMARY_SECTION_TITLE: &str = "Primary savings";
pub const SECONDARY_SECTION_TITLE: &str = "Secondary savings";
pub const INVESTMENT_FUND_SECTION_TITLE: &str = "Investments tracker";

/// The full default state.
pub fn default_state() -> AppState {
    AppState {
        budget: Budget {
            monthly_expenses: vec![
                amount_row("monthly-expense-1", "Rent", "01", 950.0),
                amount_row("monthly-expense-2", "Council tax", "05", 145.0),
                amount_row("monthly-expense-3", "Energy", "12", 110.0),
                amount_row("monthly-expense-4", "Phone & broadband", "18", 55.0),
                amount_row("monthly-expense-5", "Groceries", "28", 320.0),
            ],
            yearly_expenses: vec![
                amount_row("yearly-expense-1", "Car insurance", "14/03", 480.0),
                amount_row("yearly-expense-2", "TV licence", "01/04", 169.5),
                amount_row("yearly-expense-3", "Holiday", "20/07", 1200.0),
            ],
            monthly_budget_items: default_monthly_budget_items(),
            income_streams: vec![
                IncomeRow {
                    id: "income-1".into(),
                    label: "Salary".into(),
                    monthly_amount: 2850.0,
                },
                IncomeRow {
                    id: "income-2".into(),
                    label: "Side projects".into(),
                    monthly_amount: 200.0,
                },
            ],
        },
        savings: Savings {
            sections: default_sections(),
        },
        investments: Investments {
            start_date: "01/01/2024".into(),
            holdings: vec![
                HoldingRow {
                    id: "holding-1".into(),
                    name: "Global Index Fund".into(),
                    location: "Stocks & Shares ISA".into(),
                    amount: 2100.0,
                },
                HoldingRow {
                    id: "holding-2".into(),
                    name: "Bond Fund".into(),
                    location: "General account".into(),
                    amount: 800.0,
                },
            ],
            market_changes: vec![
                MarketChangeRow {
                    id: "market-change-1".into(),
                    date: "30/06/2024".into(),
                    amount: 150.0,
                    current_value: Some(2250.0),
                    note: "Global index fund half-year".into(),
                    holding_id: Some("holding-1".into()),
                },
                MarketChangeRow {
                    id: "market-change-2".into(),
                    date: "31/12/2024".into(),
                    amount: 400.0,
                    current_value: Some(2500.0),
                    note: "Global index fund year end".into(),
                    holding_id: Some("holding-1".into()),
                },
                MarketChangeRow {
                    id: "market-change-3".into(),
                    date: "31/12/2024".into(),
                    amount: -12.0,
                    current_value: Some(788.0),
                    note: "Bond fund year end".into(),
                    holding_id: Some("holding-2".into()),
                },
            ],
        },
    }
}

/// The five-item monthly budget template.
pub fn default_monthly_budget_items() -> Vec<MonthlyBudgetItem> {
    vec![
        budget_item("budget-item-1", "Spending money", BudgetCategory::Spending, 400.0),
        budget_item("budget-item-2", "Emergency fund", BudgetCategory::Saving, 200.0),
        budget_item("budget-item-3", "Holiday pot", BudgetCategory::Saving, 100.0),
        budget_item("budget-item-4", "Index fund investing", BudgetCategory::Investing, 150.0),
        budget_item("budget-item-5", "Pension top-up", BudgetCategory::Investing, 100.0),
    ]
}

/// The three default savings sections.
pub fn default_sections() -> Vec<SavingsSection> {
    vec![
        SavingsSection {
            id: PRIMARY_SECTION_ID.into(),
            title: PRIMARY_SECTION_TITLE.into(),
            tab: SectionTab::Savings,
            bucket: SavingsBucket {
                location: "Easy-access saver".into(),
                cash_stash: 500.0,
                regular_deposits: vec![
                    RegularDepositRow {
                        id: "regular-deposit-1".into(),
                        date: "01/01/2024".into(),
                        amount: 150.0,
                        target: 200.0,
                    },
                    RegularDepositRow {
                        id: "regular-deposit-2".into(),
                        date: "01/02/2024".into(),
                        amount: 150.0,
                        target: 200.0,
                    },
                ],
                additional_deposits: vec![AdditionalDepositRow {
                    id: "additional-deposit-1".into(),
                    date: "15/03/2024".into(),
                    amount: 900.0,
                    note: "Tax rebate".into(),
                }],
                withdrawals: Vec::new(),
                market_changes: vec![MarketChangeRow {
                    id: "market-change-1".into(),
                    date: "30/06/2024".into(),
                    amount: 50.0,
                    current_value: None,
                    note: "Interest".into(),
                    holding_id: None,
                }],
            },
        },
        SavingsSection {
            id: SECONDARY_SECTION_ID.into(),
            title: SECONDARY_SECTION_TITLE.into(),
            tab: SectionTab::Savings,
            bucket: SavingsBucket {
                location: "Regular saver".into(),
                cash_stash: 0.0,
                regular_deposits: vec![RegularDepositRow {
                    id: "regular-deposit-1".into(),
                    date: "05/01/2024".into(),
                    amount: 100.0,
                    target: 100.0,
                }],
                additional_deposits: Vec::new(),
                withdrawals: vec![WithdrawalRow {
                    id: "withdrawal-1".into(),
                    date: "20/02/2024".into(),
                    amount: 25.0,
                    reason: "Car repair".into(),
                }],
                market_changes: Vec::new(),
            },
        },
        SavingsSection {
            id: INVESTMENT_FUND_SECTION_ID.into(),
            title: INVESTMENT_FUND_SECTION_TITLE.into(),
            tab: SectionTab::Investments,
            bucket: SavingsBucket {
                location: "Lifetime ISA".into(),
                cash_stash: 0.0,
                regular_deposits: vec![RegularDepositRow {
                    id: "regular-deposit-1".into(),
                    date: "10/01/2024".into(),
                    amount: 333.0,
                    target: 333.0,
                }],
                additional_deposits: Vec::new(),
                withdrawals: Vec::new(),
                market_changes: vec![MarketChangeRow {
                    id: "market-change-1".into(),
                    date: "31/12/2024".into(),
                    amount: 83.25,
                    current_value: Some(416.25),
                    note: "Government bonus and growth".into(),
                    holding_id: None,
                }],
            },
        },
    ]
}

fn amount_row(id: &str, label: &str, date: &str, amount: f64) -> AmountRow {
    AmountRow {
        id: id.into(),
        label: label.into(),
        date: date.into(),
        amount,
    }
}

fn budget_item(id: &str, label: &str, category: BudgetCategory, amount: f64) -> MonthlyBudgetItem {
    MonthlyBudgetItem {
        id: id.into(),
        label: label.into(),
        category,
        monthly_amount: amount,
    }
}
