use std::collections::HashSet;

use tracing::debug;

use super::coerce::{field, object, rows, to_finite_number, to_identifier, to_optional_number, to_date_text, to_text, Object};
use crate::models::savings::{
    AdditionalDepositRow, MarketChangeRow, RegularDepositRow, Savings, SavingsBucket,
    SavingsSection, SectionTab, WithdrawalRow,
};
use crate::seed;

/// Keys that mark an object as a bucket (rather than a section wrapper).
const BUCKET_KEYS: &[&str] = &[
    "cashStash",
    "regularDeposits",
    "additionalDeposits",
    "withdrawals",
    "marketChanges",
];

/// Legacy fixed buckets: (key, section id, title, tab).
const LEGACY_SECTIONS: &[(&str, &str, &str, SectionTab)] = &[
    ("primary", seed::PRIMARY_SECTION_ID, seed::PRIMARY_SECTION_TITLE, SectionTab::Savings),
    ("secondary", seed::SECONDARY_SECTION_ID, seed::SECONDARY_SECTION_TITLE, SectionTab::Savings),
    ("investmentFund", seed::INVESTMENT_FUND_SECTION_ID, seed::INVESTMENT_FUND_SECTION_TITLE, SectionTab::Investments),
];

pub(super) fn migrate_savings(root: &Object, savings: &Object, holding_ids: &HashSet<String>) -> Savings {
    let sections = rows(savings.get("sections"), "section", |obj, id| {
        migrate_section(obj, id, holding_ids)
    });
    if !sections.is_empty() {
        return Savings { sections };
    }

    if let Some(sections) = legacy_sections(savings, holding_ids)
        .or_else(|| legacy_sections(root, holding_ids))
    {
        debug!("synthesized savings sections from the legacy bucket layout");
        return Savings { sections };
    }

    debug!("no savings sections found, using the default sections");
    Savings {
        sections: seed::default_sections(),
    }
}

fn migrate_section(obj: &Object, id: String, holding_ids: &HashSet<String>) -> SavingsSection {
    let title = to_text(field(obj, &["title", "name", "label"]));
    let tab = obj
        .get("tab")
        .and_then(|v| v.as_str())
        .and_then(SectionTab::from_tag)
        .unwrap_or_else(|| {
            if title.to_lowercase().contains("invest") {
                SectionTab::Investments
            } else {
                SectionTab::Savings
            }
        });
    let bucket = match object(obj, "bucket") {
        Some(bucket) => migrate_bucket(bucket, holding_ids),
        // Older sections kept the bucket fields inline.
        None if is_bucket(obj) => migrate_bucket(obj, holding_ids),
        None => SavingsBucket::default(),
    };
    SavingsSection { id, title, tab, bucket }
}

/// Three fixed sections from `primary` / `secondary` / `investmentFund`
/// objects, or from a single bucket stored directly in `obj`.
fn legacy_sections(obj: &Object, holding_ids: &HashSet<String>) -> Option<Vec<SavingsSection>> {
    let has_named = LEGACY_SECTIONS.iter().any(|(key, ..)| object(obj, key).is_some());
    if !has_named && !is_bucket(obj) {
        return None;
    }

    let sections = LEGACY_SECTIONS
        .iter()
        .map(|(key, id, title, tab)| {
            let source = match object(obj, key) {
                Some(bucket) => Some(bucket),
                None if *key == "primary" && is_bucket(obj) => Some(obj),
                None => None,
            };
            SavingsSection {
                id: (*id).to_string(),
                title: (*title).to_string(),
                tab: *tab,
                bucket: source
                    .map(|bucket| migrate_bucket(bucket, holding_ids))
                    .unwrap_or_default(),
            }
        })
        .collect();
    Some(sections)
}

fn is_bucket(obj: &Object) -> bool {
    BUCKET_KEYS.iter().any(|key| obj.contains_key(*key))
}

pub(super) fn migrate_bucket(obj: &Object, holding_ids: &HashSet<String>) -> SavingsBucket {
    let mut market_changes = rows(obj.get("marketChanges"), "market-change", market_change_row);
    for row in &mut market_changes {
        if row.holding_id.as_ref().is_some_and(|id| !holding_ids.contains(id)) {
            row.holding_id = None;
        }
    }

    SavingsBucket {
        location: to_text(obj.get("location")),
        cash_stash: to_finite_number(field(obj, &["cashStash", "cash"]), 0.0),
        regular_deposits: rows(obj.get("regularDeposits"), "regular-deposit", |row, id| {
            RegularDepositRow {
                id,
                date: to_date_text(row.get("date")),
                amount: to_finite_number(row.get("amount"), 0.0),
                target: to_finite_number(row.get("target"), 0.0),
            }
        }),
        additional_deposits: rows(obj.get("additionalDeposits"), "additional-deposit", |row, id| {
            AdditionalDepositRow {
                id,
                date: to_date_text(row.get("date")),
                amount: to_finite_number(row.get("amount"), 0.0),
                note: to_text(field(row, &["note", "description"])),
            }
        }),
        withdrawals: rows(obj.get("withdrawals"), "withdrawal", |row, id| WithdrawalRow {
            id,
            date: to_date_text(row.get("date")),
            amount: to_finite_number(row.get("amount"), 0.0),
            reason: to_text(field(row, &["reason", "note"])),
        }),
        market_changes,
    }
}

/// Shape of a market-change row, shared by buckets and investments.
pub(super) fn market_change_row(obj: &Object, id: String) -> MarketChangeRow {
    MarketChangeRow {
        id,
        date: to_date_text(obj.get("date")),
        amount: to_finite_number(obj.get("amount"), 0.0),
        current_value: to_optional_number(field(obj, &["currentValue", "value"])),
        note: to_text(field(obj, &["note", "description"])),
        holding_id: to_identifier(obj.get("holdingId")),
    }
}
