use uuid::Uuid;

use crate::dates::DateMode;
use crate::models::budget::BudgetCategory;
use crate::models::savings::SectionTab;
use crate::models::state::AppState;

/// Which row collection an action addresses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowTarget {
    MonthlyExpense,
    YearlyExpense,
    MonthlyBudgetItem,
    IncomeStream,
    RegularDeposit { section_id: String },
    AdditionalDeposit { section_id: String },
    Withdrawal { section_id: String },
    BucketMarketChange { section_id: String },
    Holding,
    InvestmentMarketChange,
}

impl RowTarget {
    /// Human-readable collection name, used in errors and audit entries.
    pub fn collection_name(&self) -> &'static str {
        match self {
            RowTarget::MonthlyExpense => "Monthly expenses",
            RowTarget::YearlyExpense => "Yearly expenses",
            RowTarget::MonthlyBudgetItem => "Monthly budget",
            RowTarget::IncomeStream => "Income",
            RowTarget::RegularDeposit { .. } => "Regular deposits",
            RowTarget::AdditionalDeposit { .. } => "Additional deposits",
            RowTarget::Withdrawal { .. } => "Withdrawals",
            RowTarget::BucketMarketChange { .. } => "Market changes",
            RowTarget::Holding => "Holdings",
            RowTarget::InvestmentMarketChange => "Investment market changes",
        }
    }

    /// Prefix used when generating ids for new rows.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            RowTarget::MonthlyExpense => "monthly-expense",
            RowTarget::YearlyExpense => "yearly-expense",
            RowTarget::MonthlyBudgetItem => "budget-item",
            RowTarget::IncomeStream => "income",
            RowTarget::RegularDeposit { .. } => "regular-deposit",
            RowTarget::AdditionalDeposit { .. } => "additional-deposit",
            RowTarget::Withdrawal { .. } => "withdrawal",
            RowTarget::BucketMarketChange { .. } | RowTarget::InvestmentMarketChange => {
                "market-change"
            }
            RowTarget::Holding => "holding",
        }
    }

    /// How the collection's `date` field is displayed, if it has one.
    pub fn date_mode(&self) -> Option<DateMode> {
        match self {
            RowTarget::MonthlyExpense => Some(DateMode::Day),
            RowTarget::YearlyExpense => Some(DateMode::DayMonth),
            RowTarget::MonthlyBudgetItem | RowTarget::IncomeStream | RowTarget::Holding => None,
            _ => Some(DateMode::Full),
        }
    }

    /// The savings section a bucket collection lives in.
    pub fn section_id(&self) -> Option<&str> {
        match self {
            RowTarget::RegularDeposit { section_id }
            | RowTarget::AdditionalDeposit { section_id }
            | RowTarget::Withdrawal { section_id }
            | RowTarget::BucketMarketChange { section_id } => Some(section_id),
            _ => None,
        }
    }
}

/// A single-field edit.
#[derive(Debug, Clone, PartialEq)]
pub enum RowPatch {
    Label(String),
    Name(String),
    Location(String),
    Date(String),
    Note(String),
    Reason(String),
    Amount(f64),
    Target(f64),
    MonthlyAmount(f64),
    Category(BudgetCategory),
    /// `None` clears the snapshot and makes the row a relative edit again
    CurrentValue(Option<f64>),
    /// `None` unassigns the row
    HoldingId(Option<String>),
}

impl RowPatch {
    /// Serialized field name the patch writes to.
    pub fn field_name(&self) -> &'static str {
        match self {
            RowPatch::Label(_) => "label",
            RowPatch::Name(_) => "name",
            RowPatch::Location(_) => "location",
            RowPatch::Date(_) => "date",
            RowPatch::Note(_) => "note",
            RowPatch::Reason(_) => "reason",
            RowPatch::Amount(_) => "amount",
            RowPatch::Target(_) => "target",
            RowPatch::MonthlyAmount(_) => "monthlyAmount",
            RowPatch::Category(_) => "category",
            RowPatch::CurrentValue(_) => "currentValue",
            RowPatch::HoldingId(_) => "holdingId",
        }
    }
}

/// Every state change goes through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddRow {
        target: RowTarget,
        row_id: String,
    },
    UpdateRow {
        target: RowTarget,
        row_id: String,
        patch: RowPatch,
    },
    RemoveRow {
        target: RowTarget,
        row_id: String,
    },
    AddSection {
        section_id: String,
        title: String,
        tab: SectionTab,
    },
    RemoveSection {
        section_id: String,
    },
    RenameSection {
        section_id: String,
        title: String,
    },
    SetSectionTab {
        section_id: String,
        tab: SectionTab,
    },
    SetBucketLocation {
        section_id: String,
        location: String,
    },
    SetCashStash {
        section_id: String,
        amount: f64,
    },
    SetInvestmentStartDate(String),
    /// Swap in a whole state (reset to defaults, import)
    ReplaceState(Box<AppState>),
}

impl Action {
    /// Add a blank row with a freshly generated id.
    pub fn add_row(target: RowTarget) -> Self {
        let row_id = format!("{}-{}", target.id_prefix(), Uuid::new_v4());
        Action::AddRow { target, row_id }
    }

    /// Add an empty section with a freshly generated id.
    pub fn add_section(title: impl Into<String>, tab: SectionTab) -> Self {
        Action::AddSection {
            section_id: format!("section-{}", Uuid::new_v4()),
            title: title.into(),
            tab,
        }
    }

    pub fn update_row(target: RowTarget, row_id: impl Into<String>, patch: RowPatch) -> Self {
        Action::UpdateRow {
            target,
            row_id: row_id.into(),
            patch,
        }
    }

    pub fn remove_row(target: RowTarget, row_id: impl Into<String>) -> Self {
        Action::RemoveRow {
            target,
            row_id: row_id.into(),
        }
    }
}
