use tracing::debug;

use super::coerce::{field, rows, to_date_text, to_finite_number, to_text, Object};
use crate::models::budget::{AmountRow, Budget, BudgetCategory, IncomeRow, MonthlyBudgetItem};
use crate::seed;

/// Flat per-category amounts stored before budget items existed.
const LEGACY_BUDGET_FIELDS: &[(&[&str], &str, BudgetCategory)] = &[
    (&["monthlySpendingBudget"], "Spending", BudgetCategory::Spending),
    (&["monthlySavingBudget", "monthlySavingsBudget"], "Saving", BudgetCategory::Saving),
    (&["monthlyInvestingBudget", "monthlyInvestmentBudget"], "Investing", BudgetCategory::Investing),
    (&["monthlyPensionBudget"], "Pension", BudgetCategory::Investing),
];

pub(super) fn migrate_budget(root: &Object, budget: &Object) -> Budget {
    let monthly_expenses = rows(budget.get("monthlyExpenses"), "monthly-expense", amount_row);
    let yearly_expenses = rows(budget.get("yearlyExpenses"), "yearly-expense", amount_row);
    let income_streams = rows(budget.get("incomeStreams"), "income", |obj, id| IncomeRow {
        id,
        label: to_text(field(obj, &["label", "name"])),
        monthly_amount: to_finite_number(field(obj, &["monthlyAmount", "amount"]), 0.0),
    });

    let mut monthly_budget_items =
        rows(budget.get("monthlyBudgetItems"), "budget-item", budget_item);
    if monthly_budget_items.is_empty() {
        monthly_budget_items = legacy_budget_items(budget)
            .or_else(|| legacy_budget_items(root))
            .unwrap_or_else(|| {
                debug!("no monthly budget items found, using the default template");
                seed::default_monthly_budget_items()
            });
    }

    Budget {
        monthly_expenses,
        yearly_expenses,
        monthly_budget_items,
        income_streams,
    }
}

fn amount_row(obj: &Object, id: String) -> AmountRow {
    AmountRow {
        id,
        label: to_text(field(obj, &["label", "name"])),
        date: to_date_text(obj.get("date")),
        amount: to_finite_number(obj.get("amount"), 0.0),
    }
}

fn budget_item(obj: &Object, id: String) -> MonthlyBudgetItem {
    let label = to_text(field(obj, &["label", "name"]));
    let category = obj
        .get("category")
        .and_then(|v| v.as_str())
        .and_then(BudgetCategory::from_tag)
        .unwrap_or_else(|| BudgetCategory::infer_from_label(&label));
    MonthlyBudgetItem {
        id,
        label,
        category,
        monthly_amount: to_finite_number(field(obj, &["monthlyAmount", "amount"]), 0.0),
    }
}

/// Rebuild budget items from the flat legacy fields present in `obj`.
fn legacy_budget_items(obj: &Object) -> Option<Vec<MonthlyBudgetItem>> {
    let items: Vec<MonthlyBudgetItem> = LEGACY_BUDGET_FIELDS
        .iter()
        .filter_map(|(names, label, category)| {
            let value = field(obj, names)?;
            Some((*label, *category, to_finite_number(Some(value), 0.0)))
        })
        .enumerate()
        .map(|(idx, (label, category, monthly_amount))| MonthlyBudgetItem {
            id: format!("budget-item-{}", idx + 1),
            label: label.to_string(),
            category,
            monthly_amount,
        })
        .collect();

    if items.is_empty() {
        None
    } else {
        debug!(count = items.len(), "rebuilt monthly budget items from legacy fields");
        Some(items)
    }
}
