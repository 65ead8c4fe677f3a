use serde::{Deserialize, Serialize};

/// Closed set of budget categories a monthly budget item can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetCategory {
    /// Day-to-day spending money
    Spending,
    /// Cash put aside into savings
    Saving,
    /// Money invested (funds, pensions, shares)
    Investing,
}

impl BudgetCategory {
    /// Parse one of the current category tags. Legacy or unknown tags return `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "spending" => Some(Self::Spending),
            "saving" => Some(Self::Saving),
            "investing" => Some(Self::Investing),
            _ => None,
        }
    }

    /// Infer a category from an item label.
    ///
    /// "spend" → spending, "invest" or "pension" → investing, anything else → saving.
    pub fn infer_from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("spend") {
            Self::Spending
        } else if lower.contains("invest") || lower.contains("pension") {
            Self::Investing
        } else {
            Self::Saving
        }
    }
}

impl std::fmt::Display for BudgetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetCategory::Spending => write!(f, "spending"),
            BudgetCategory::Saving => write!(f, "saving"),
            BudgetCategory::Investing => write!(f, "investing"),
        }
    }
}

/// A recurring expense line (monthly or yearly).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountRow {
    pub id: String,
    pub label: String,
    /// Display date: `DD` for monthly expenses, `DD/MM` for yearly ones
    pub date: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRow {
    pub id: String,
    pub label: String,
    pub monthly_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBudgetItem {
    pub id: String,
    pub label: String,
    pub category: BudgetCategory,
    pub monthly_amount: f64,
}

/// Everything on the budget page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub monthly_expenses: Vec<AmountRow>,
    pub yearly_expenses: Vec<AmountRow>,
    pub monthly_budget_items: Vec<MonthlyBudgetItem>,
    pub income_streams: Vec<IncomeRow>,
}

impl Budget {
    /// Sum of the monthly amounts of every item in `category`.
    pub fn category_total(&self, category: BudgetCategory) -> f64 {
        self.monthly_budget_items
            .iter()
            .filter(|item| item.category == category)
            .map(|item| item.monthly_amount)
            .filter(|v| v.is_finite())
            .sum()
    }
}
